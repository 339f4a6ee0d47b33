//! Trait seams of the job pipeline for dependency injection

use async_trait::async_trait;
use shared::ItemId;

use crate::error::JobResult;
use crate::types::{GenerationParams, JobStatus, QueueTicket};

/// Remote queue-based image generation service
#[mockall::automock]
#[async_trait]
pub trait JobService: Send + Sync {
    /// Enqueue a generation job for `prompt`
    async fn submit(&self, prompt: &str, params: &GenerationParams) -> JobResult<QueueTicket>;

    /// Read the current status of a submitted job
    async fn poll(&self, status_url: &str) -> JobResult<JobStatus>;

    /// Fetch the result payload of a completed job
    async fn fetch(&self, response_url: &str) -> JobResult<serde_json::Value>;

    /// Download the bytes behind an image reference
    async fn download(&self, image_url: &str) -> JobResult<Vec<u8>>;
}

/// Storage of finished per-item artifacts
#[mockall::automock]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// True when a non-empty artifact for `item_id` already exists
    async fn is_complete(&self, item_id: ItemId) -> bool;

    /// Store `bytes` as the artifact of `item_id`, replacing any previous one
    async fn persist(&self, item_id: ItemId, bytes: &[u8]) -> JobResult<()>;
}
