//! Job pipeline error types

use thiserror::Error;

/// Result type for job operations
pub type JobResult<T> = Result<T, JobError>;

/// Failure of a single attempt at producing an item's image
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Submission rejected: {message}")]
    RemoteSubmission { message: String },

    #[error("Remote job {status}: {message}")]
    RemoteFailure { status: String, message: String },

    #[error("Remote job did not finish after {polls} polls")]
    RemoteTimeout { polls: u32 },

    #[error("Unexpected response shape: {message}")]
    ResponseShape { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Credential rejected by remote service (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Download failed: {message}")]
    Download { message: String },

    #[error("Failed to persist artifact: {source}")]
    Persist {
        #[from]
        source: std::io::Error,
    },
}

/// Coarse class of a [`JobError`], used for retry decisions and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobErrorClass {
    Submission,
    RemoteFailure,
    Timeout,
    ResponseShape,
    Transport,
    Auth,
    Download,
    Persist,
}

impl JobErrorClass {
    pub fn is_retryable(self) -> bool {
        match self {
            JobErrorClass::Submission
            | JobErrorClass::RemoteFailure
            | JobErrorClass::Timeout
            | JobErrorClass::ResponseShape
            | JobErrorClass::Transport
            | JobErrorClass::Auth
            | JobErrorClass::Download
            | JobErrorClass::Persist => true,
        }
    }
}

impl JobError {
    pub fn submission(message: impl Into<String>) -> Self {
        Self::RemoteSubmission { message: message.into() }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::ResponseShape { message: message.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn download(message: impl Into<String>) -> Self {
        Self::Download { message: message.into() }
    }

    pub fn class(&self) -> JobErrorClass {
        match self {
            JobError::RemoteSubmission { .. } => JobErrorClass::Submission,
            JobError::RemoteFailure { .. } => JobErrorClass::RemoteFailure,
            JobError::RemoteTimeout { .. } => JobErrorClass::Timeout,
            JobError::ResponseShape { .. } => JobErrorClass::ResponseShape,
            JobError::Transport { .. } => JobErrorClass::Transport,
            JobError::Unauthorized { .. } => JobErrorClass::Auth,
            JobError::Download { .. } => JobErrorClass::Download,
            JobError::Persist { .. } => JobErrorClass::Persist,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}
