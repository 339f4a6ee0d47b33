//! fal.ai queue client

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::error::{JobError, JobResult};
use crate::traits::JobService;
use crate::types::{GenerationParams, JobStatus, PipelineConfig, QueueTicket, SubmitRequest};
use shared::{process_debug, ProcessId};

/// Real [`JobService`] over the fal.ai queue REST API
pub struct FalQueueClient {
    client: Client,
    api_key: String,
    submit_url: String,
    request_timeout: std::time::Duration,
    download_timeout: std::time::Duration,
}

impl FalQueueClient {
    pub fn new(api_key: impl Into<String>, config: &PipelineConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            submit_url: config.submit_url(),
            request_timeout: config.request_timeout,
            download_timeout: config.download_timeout,
        }
    }

    pub fn submit_url(&self) -> &str {
        &self.submit_url
    }

    fn auth_header(&self) -> String {
        format!("Key {}", self.api_key)
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> JobResult<Value> {
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth_header())
            .query(query)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| JobError::transport(e.to_string()))?;

        let response = check_status(response, |m| JobError::transport(m)).await?;
        response
            .json()
            .await
            .map_err(|e| JobError::transport(format!("invalid JSON body: {e}")))
    }
}

/// Map HTTP failures of queue requests: 401/403 are credential rejections,
/// anything else goes through `other`
async fn check_status(response: Response, other: fn(String) -> JobError) -> JobResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JobError::Unauthorized {
            status: status.as_u16(),
        }),
        _ => Err(other(format!("HTTP {status}: {}", body_preview(response).await))),
    }
}

async fn body_preview(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    body.chars().take(200).collect()
}

fn required_str(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl JobService for FalQueueClient {
    async fn submit(&self, prompt: &str, params: &GenerationParams) -> JobResult<QueueTicket> {
        let body = SubmitRequest { prompt, params };
        let response = self
            .client
            .post(&self.submit_url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| JobError::transport(e.to_string()))?;

        let response = check_status(response, |m| JobError::submission(m)).await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| JobError::submission(format!("invalid JSON body: {e}")))?;

        let (Some(status_url), Some(response_url)) =
            (required_str(&payload, "status_url"), required_str(&payload, "response_url"))
        else {
            return Err(JobError::submission(format!(
                "missing status/response URLs in queue response: {payload}"
            )));
        };

        let ticket = QueueTicket {
            request_id: required_str(&payload, "request_id"),
            status_url,
            response_url,
        };
        process_debug!(
            ProcessId::current(),
            "Queued request {}",
            ticket.request_id.as_deref().unwrap_or("?")
        );
        Ok(ticket)
    }

    async fn poll(&self, status_url: &str) -> JobResult<JobStatus> {
        let payload = self.get_json(status_url, &[("logs", "1")]).await?;
        Ok(JobStatus::from_payload(&payload))
    }

    async fn fetch(&self, response_url: &str) -> JobResult<Value> {
        self.get_json(response_url, &[]).await
    }

    async fn download(&self, image_url: &str) -> JobResult<Vec<u8>> {
        let response = self
            .client
            .get(image_url)
            .timeout(self.download_timeout)
            .send()
            .await
            .map_err(|e| JobError::download(e.to_string()))?;

        // The image host never sees the credential, so every status is a download failure
        let status = response.status();
        if !status.is_success() {
            return Err(JobError::download(format!(
                "HTTP {status} from {image_url}: {}",
                body_preview(response).await
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| JobError::download(e.to_string()))?;

        if bytes.is_empty() {
            return Err(JobError::download(format!("empty body from {image_url}")));
        }
        Ok(bytes.to_vec())
    }
}
