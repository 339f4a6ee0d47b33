//! Run orchestrator for the image generation step
//!
//! Loads the collection descriptor, plans which items to (re)generate and
//! drives them one by one through the producer job pipeline, ending with a
//! report that lists every failed item.

pub mod core;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod traits;

pub use crate::core::{pacing_delay, CollectionEntry, CollectionIndex, RunPlan, RunReport};
pub use error::{OrchestratorError, OrchestratorResult};
pub use orchestrator::RunOrchestrator;
pub use services::{RealApiKeySource, RealPacer};
pub use traits::{ApiKeySource, MockApiKeySource, MockPacer, Pacer};
