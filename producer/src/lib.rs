//! Image job pipeline
//!
//! Turns a prompt into an image file through a remote queue-based generation
//! service: submit, poll, fetch, extract, download and persist, with a bounded
//! retry wrapper and a resume check in front.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

pub use crate::core::{extract_image_url, JobPipeline};
pub use error::{JobError, JobErrorClass, JobResult};
pub use services::{FalQueueClient, RealArtifactStore};
pub use traits::*;
pub use types::*;
