//! Shared types for the Chibi Agent collection tooling
//!
//! Contains the domain types that cross crate boundaries: item ids, trait
//! kinds and assignments, rarity tiers, the collection record written by the
//! generator and read by the image runner, and the on-disk output layout.

pub mod errors;
pub mod layout;
pub mod logging;
pub mod types;

pub use errors::*;
pub use layout::{write_atomic, OutputLayout};
pub use types::*;
