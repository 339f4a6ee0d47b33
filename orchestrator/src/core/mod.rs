//! Run orchestrator core logic

pub mod collection;
pub mod plan;
pub mod report;

pub use collection::{CollectionEntry, CollectionIndex};
pub use plan::{pacing_delay, RunPlan};
pub use report::RunReport;
