//! Common test utilities for orchestrator tests

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::RunBuilder;
