//! Job pipeline service implementations

pub mod artifact_store;
pub mod fal_client;

#[cfg(test)]
pub mod tests;

pub use artifact_store::*;
pub use fal_client::*;
