//! Job pipeline types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::ItemId;

use crate::error::JobError;

/// Generation parameters sent with every submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub aspect_ratio: String,
    pub output_format: String,
    pub num_images: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            aspect_ratio: "1:1".to_string(),
            output_format: "png".to_string(),
            num_images: 1,
        }
    }
}

/// Body of a queue submission
#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    pub prompt: &'a str,
    #[serde(flatten)]
    pub params: &'a GenerationParams,
}

/// Tunables of the job pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub queue_base: String,
    pub model_id: String,
    pub params: GenerationParams,
    /// Sleep before each repeat poll
    pub poll_interval: Duration,
    pub max_polls: u32,
    /// Attempt ceiling per item, first attempt included
    pub max_attempts: u32,
    /// Retry n sleeps `backoff_unit * 2^n`
    pub backoff_unit: Duration,
    pub request_timeout: Duration,
    pub download_timeout: Duration,
}

impl PipelineConfig {
    pub const DEFAULT_QUEUE_BASE: &'static str = "https://queue.fal.run";
    pub const DEFAULT_MODEL_ID: &'static str = "fal-ai/nano-banana";

    pub fn with_queue_base(mut self, queue_base: impl Into<String>) -> Self {
        self.queue_base = queue_base.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.backoff_unit = backoff_unit;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Submission endpoint, `{queue_base}/{model_id}`
    pub fn submit_url(&self) -> String {
        format!(
            "{}/{}",
            self.queue_base.trim_end_matches('/'),
            self.model_id.trim_start_matches('/')
        )
    }

    /// Sleep after failed attempt `attempt` (1-based), or `None` when no
    /// attempt follows
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.backoff_unit.saturating_mul(1u32 << attempt.min(16)))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_base: Self::DEFAULT_QUEUE_BASE.to_string(),
            model_id: Self::DEFAULT_MODEL_ID.to_string(),
            params: GenerationParams::default(),
            poll_interval: Duration::from_secs(2),
            max_polls: 150,
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            download_timeout: Duration::from_secs(120),
        }
    }
}

/// Handles returned by a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTicket {
    pub request_id: Option<String>,
    pub status_url: String,
    pub response_url: String,
}

/// Remote job status as reported by the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    InQueue,
    InProgress,
    Completed,
    Failed { message: String },
    Cancelled { message: String },
    Unknown(String),
}

impl JobStatus {
    /// Interpret a status payload; a missing `status` is `Unknown`
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        let status = payload.get("status").and_then(|s| s.as_str()).unwrap_or("UNKNOWN");
        let message = || {
            payload
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string()
        };

        match status {
            "IN_QUEUE" => JobStatus::InQueue,
            "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed { message: message() },
            "CANCELLED" => JobStatus::Cancelled { message: message() },
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed { .. } | JobStatus::Cancelled { .. }
        )
    }
}

/// Position of an item inside one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Pending,
    Submitted,
    Polling,
    /// Remote job finished; fetching, downloading and saving the result
    Retrieving,
    Completed,
    Failed,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::Pending => "pending",
            JobPhase::Submitted => "submitted",
            JobPhase::Polling => "polling",
            JobPhase::Retrieving => "retrieving",
            JobPhase::Completed => "completed",
            JobPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// State of the retry wrapper around the attempt state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    /// Attempt `n` (1-based) is due or running
    Attempting(u32),
    Succeeded { attempts: u32 },
    Exhausted { attempts: u32, last_error: String },
}

/// Progress record of one item through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub item_id: ItemId,
    pub phase: JobPhase,
    pub attempt: AttemptState,
    /// Queue endpoints of the current attempt, once submitted
    pub ticket: Option<QueueTicket>,
}

impl JobRecord {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            phase: JobPhase::Pending,
            attempt: AttemptState::Attempting(1),
            ticket: None,
        }
    }

    /// Reset the per-attempt state before resubmitting
    pub fn begin_attempt(&mut self) {
        self.phase = JobPhase::Pending;
        self.ticket = None;
    }

    pub fn submitted(&mut self, ticket: QueueTicket) {
        self.phase = JobPhase::Submitted;
        self.ticket = Some(ticket);
    }

    pub fn polling(&mut self) {
        self.phase = JobPhase::Polling;
    }

    pub fn retrieving(&mut self) {
        self.phase = JobPhase::Retrieving;
    }

    pub fn request_id(&self) -> &str {
        self.ticket
            .as_ref()
            .and_then(|t| t.request_id.as_deref())
            .unwrap_or("-")
    }

    pub fn succeed(&mut self) {
        if let AttemptState::Attempting(n) = self.attempt {
            self.phase = JobPhase::Completed;
            self.attempt = AttemptState::Succeeded { attempts: n };
        }
    }

    /// Record a failed attempt
    ///
    /// Moves on to the next attempt when the failure is retryable and the
    /// ceiling is not reached, otherwise the record becomes exhausted.
    pub fn fail_attempt(&mut self, error: &JobError, max_attempts: u32) {
        if let AttemptState::Attempting(n) = self.attempt {
            if error.is_retryable() && n < max_attempts {
                self.attempt = AttemptState::Attempting(n + 1);
            } else {
                self.phase = JobPhase::Failed;
                self.attempt = AttemptState::Exhausted {
                    attempts: n,
                    last_error: error.to_string(),
                };
            }
        }
    }
}

/// Final outcome of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Artifact was already on disk; no remote call made
    AlreadyComplete,
    Completed { attempts: u32 },
    Failed { attempts: u32, last_error: String },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ItemOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_backoff_schedule() {
        let config = PipelineConfig::default();
        assert_eq!(config.backoff_after(1), Some(Duration::from_secs(2)));
        assert_eq!(config.backoff_after(2), Some(Duration::from_secs(4)));
        assert_eq!(config.backoff_after(3), None);
    }

    #[test]
    fn test_submit_url_joins_base_and_model() {
        let config = PipelineConfig::default();
        assert_eq!(config.submit_url(), "https://queue.fal.run/fal-ai/nano-banana");

        let config = config.with_queue_base("http://127.0.0.1:9000/").with_model_id("fal-ai/other");
        assert_eq!(config.submit_url(), "http://127.0.0.1:9000/fal-ai/other");
    }

    #[test]
    fn test_submit_body_shape() {
        let params = GenerationParams::default();
        let body = serde_json::to_value(SubmitRequest {
            prompt: "Chibi agent",
            params: &params,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"prompt": "Chibi agent", "aspect_ratio": "1:1", "output_format": "png", "num_images": 1})
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(JobStatus::from_payload(&json!({"status": "IN_QUEUE"})), JobStatus::InQueue);
        assert_eq!(JobStatus::from_payload(&json!({"status": "COMPLETED"})), JobStatus::Completed);
        assert_eq!(
            JobStatus::from_payload(&json!({"status": "FAILED", "error": "boom"})),
            JobStatus::Failed { message: "boom".to_string() }
        );
        assert_eq!(
            JobStatus::from_payload(&json!({"status": "CANCELLED"})),
            JobStatus::Cancelled { message: "Unknown error".to_string() }
        );
        assert_eq!(JobStatus::from_payload(&json!({})), JobStatus::Unknown("UNKNOWN".to_string()));
        assert!(!JobStatus::Unknown("WEIRD".to_string()).is_terminal());
    }

    fn ticket() -> QueueTicket {
        QueueTicket {
            request_id: Some("req-7".to_string()),
            status_url: "https://queue.test/status".to_string(),
            response_url: "https://queue.test/response".to_string(),
        }
    }

    #[test]
    fn test_record_advances_through_retries() {
        let mut record = JobRecord::new(ItemId::new(7));
        record.submitted(ticket());
        assert_eq!(record.request_id(), "req-7");
        record.polling();

        record.fail_attempt(&JobError::RemoteTimeout { polls: 3 }, 2);
        assert_eq!(record.attempt, AttemptState::Attempting(2));

        record.begin_attempt();
        assert_eq!(record.phase, JobPhase::Pending);
        assert_eq!(record.ticket, None);

        record.fail_attempt(&JobError::transport("reset"), 2);
        assert_eq!(record.phase, JobPhase::Failed);
        assert_eq!(
            record.attempt,
            AttemptState::Exhausted {
                attempts: 2,
                last_error: "Transport error: reset".to_string()
            }
        );
    }

    #[test]
    fn test_record_success_keeps_attempt_count() {
        let mut record = JobRecord::new(ItemId::new(7));
        record.fail_attempt(&JobError::shape("no images"), 3);
        record.begin_attempt();
        record.submitted(ticket());
        record.retrieving();
        record.succeed();

        assert_eq!(record.phase, JobPhase::Completed);
        assert_eq!(record.attempt, AttemptState::Succeeded { attempts: 2 });
        assert_eq!(record.ticket.as_ref().map(|t| t.response_url.as_str()), Some("https://queue.test/response"));
    }
}
