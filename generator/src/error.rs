//! Generator-specific error types

use shared::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Generation exhausted: no unique combination for item {item_id} after {attempts} attempts")]
    GenerationExhausted { item_id: ItemId, attempts: u64 },

    #[error("Combination space too small: {requested} items requested with {extras} extras but only {available} distinct combinations exist")]
    CombinationSpaceTooSmall { extras: u8, requested: u32, available: u128 },

    #[error("Metadata directory not found: {path}")]
    MetadataDirMissing { path: String },

    #[error("Invalid content identifier: {input:?}")]
    InvalidCid { input: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    pub fn config(message: impl Into<String>) -> Self {
        GeneratorError::Configuration { message: message.into() }
    }

    /// True for both flavours of "not enough distinct combinations"
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            GeneratorError::GenerationExhausted { .. } | GeneratorError::CombinationSpaceTooSmall { .. }
        )
    }
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
