//! Shared error types for the collection tooling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid item id: {input}")]
    InvalidItemId { input: String },

    #[error("Unknown trait kind: {input}")]
    UnknownTraitKind { input: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SharedResult<T> = Result<T, SharedError>;
