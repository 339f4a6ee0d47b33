//! Trait seams of the run orchestrator

use std::time::Duration;

use async_trait::async_trait;

use crate::error::OrchestratorResult;

/// Source of the remote service credential
#[mockall::automock]
#[async_trait]
pub trait ApiKeySource: Send + Sync {
    /// The credential, or `CredentialMissing` when absent or empty
    async fn get_api_key(&self) -> OrchestratorResult<String>;
}

/// Rate limiting between consecutive items
#[mockall::automock]
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}
