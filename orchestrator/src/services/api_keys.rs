//! Environment-based credential source
//!
//! The fal.ai key is read from `FAL_KEY`. A `.env` file in the current
//! directory or a parent is loaded first if present; variables already set in
//! the environment take precedence over it.

use async_trait::async_trait;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::ApiKeySource;

/// Real API key source using environment variables
pub struct RealApiKeySource {
    var: String,
}

impl RealApiKeySource {
    pub const FAL_KEY_VAR: &'static str = "FAL_KEY";

    pub fn new() -> Self {
        Self::with_var(Self::FAL_KEY_VAR)
    }

    /// Read the credential from `var` instead of `FAL_KEY`
    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    fn init_env() {
        let _ = dotenv::dotenv();
    }
}

impl Default for RealApiKeySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiKeySource for RealApiKeySource {
    async fn get_api_key(&self) -> OrchestratorResult<String> {
        Self::init_env();

        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(OrchestratorError::CredentialMissing { var: self.var.clone() }),
        }
    }
}
