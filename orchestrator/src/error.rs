//! Run orchestrator error types

use shared::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("{var} environment variable not set")]
    CredentialMissing { var: String },

    #[error("Cannot read collection {path}: {reason}")]
    CollectionUnreadable { path: String, reason: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Token ID {item_id} not found in collection, skipping")]
    ItemNotFound { item_id: ItemId },

    #[error("Image store unavailable: {0}")]
    Store(#[from] producer::JobError),
}

impl OrchestratorError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
