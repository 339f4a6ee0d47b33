//! Per-item job pipeline
//!
//! One item moves `Pending -> Submitted -> Polling -> Retrieving -> Completed`
//! inside an attempt, tracked on a [`JobRecord`]. A failed attempt advances
//! the record's attempt state, and the loop re-enters at submission while that
//! state is still `Attempting`.

use tokio::time::sleep;

use crate::core::extract::extract_image_url;
use crate::error::{JobError, JobResult};
use crate::traits::{ArtifactStore, JobService};
use crate::types::{AttemptState, ItemOutcome, JobRecord, JobStatus, PipelineConfig};
use shared::{process_debug, process_info, process_warn, ItemId, ProcessId};

/// Drives items through a [`JobService`] into an [`ArtifactStore`]
pub struct JobPipeline<S: JobService, A: ArtifactStore> {
    service: S,
    store: A,
    config: PipelineConfig,
}

impl<S: JobService, A: ArtifactStore> JobPipeline<S, A> {
    pub fn new(service: S, store: A, config: PipelineConfig) -> Self {
        Self { service, store, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &A {
        &self.store
    }

    /// Produce the artifact of `item_id` from `prompt`
    ///
    /// Unless `force` is set, an existing non-empty artifact short-circuits
    /// before any remote call. Failures are folded into the outcome and never
    /// returned as errors.
    pub async fn process(&self, item_id: ItemId, prompt: &str, force: bool) -> ItemOutcome {
        if !force && self.store.is_complete(item_id).await {
            process_debug!(ProcessId::current(), "{} already has an image, skipping", item_id);
            return ItemOutcome::AlreadyComplete;
        }

        let max_attempts = self.config.max_attempts.max(1);
        let mut record = JobRecord::new(item_id);

        loop {
            let attempt = match &record.attempt {
                AttemptState::Attempting(n) => *n,
                AttemptState::Succeeded { attempts } => return ItemOutcome::Completed { attempts: *attempts },
                AttemptState::Exhausted { attempts, last_error } => {
                    return ItemOutcome::Failed {
                        attempts: *attempts,
                        last_error: last_error.clone(),
                    }
                }
            };

            record.begin_attempt();
            match self.run_attempt(&mut record, prompt).await {
                Ok(()) => record.succeed(),
                Err(e) => {
                    process_warn!(
                        ProcessId::current(),
                        "Attempt {}/{} for {} failed while {} (request {}): {}",
                        attempt,
                        max_attempts,
                        item_id,
                        record.phase,
                        record.request_id(),
                        e
                    );
                    record.fail_attempt(&e, max_attempts);

                    if let AttemptState::Attempting(_) = record.attempt {
                        if let Some(delay) = self.config.backoff_after(attempt) {
                            process_info!(ProcessId::current(), "Retrying {} in {:?}", item_id, delay);
                            sleep(delay).await;
                        }
                    }
                }
            }
        }
    }

    async fn run_attempt(&self, record: &mut JobRecord, prompt: &str) -> JobResult<()> {
        let ticket = self.service.submit(prompt, &self.config.params).await?;
        record.submitted(ticket.clone());

        self.wait_for_completion(record, &ticket.status_url).await?;

        record.retrieving();
        let payload = self.service.fetch(&ticket.response_url).await?;
        let image_url = extract_image_url(&payload)?;
        let bytes = self.service.download(&image_url).await?;
        self.store.persist(record.item_id, &bytes).await?;

        process_debug!(
            ProcessId::current(),
            "{} done (request {})",
            record.item_id,
            record.request_id()
        );
        Ok(())
    }

    /// Poll until the job reaches a terminal status or `max_polls` runs out
    async fn wait_for_completion(&self, record: &mut JobRecord, status_url: &str) -> JobResult<()> {
        for poll in 1..=self.config.max_polls {
            if poll > 1 {
                sleep(self.config.poll_interval).await;
            }

            let status = self.service.poll(status_url).await?;
            record.polling();
            match status {
                JobStatus::Completed => return Ok(()),
                JobStatus::Failed { message } => {
                    return Err(JobError::RemoteFailure {
                        status: "FAILED".to_string(),
                        message,
                    })
                }
                JobStatus::Cancelled { message } => {
                    return Err(JobError::RemoteFailure {
                        status: "CANCELLED".to_string(),
                        message,
                    })
                }
                status => {
                    process_debug!(ProcessId::current(), "Poll {}: {:?}", poll, status);
                }
            }
        }

        Err(JobError::RemoteTimeout {
            polls: self.config.max_polls,
        })
    }
}
