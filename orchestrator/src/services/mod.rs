//! Run orchestrator service implementations

pub mod api_keys;
pub mod pacer;

pub use api_keys::RealApiKeySource;
pub use pacer::RealPacer;
