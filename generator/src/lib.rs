//! Chibi Agent collection generator
//!
//! Assigns a unique, rarity-weighted trait set to every item of the
//! collection, renders each set into an image-generation prompt and writes the
//! collection descriptor, the prompt list and per-item metadata documents.

pub mod combination;
pub mod config;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pools;
pub mod prompt;
pub mod rarity;

pub use combination::{generate_collection, CombinationGenerator, GeneratedCollection, GenerationRun, SeenCombinationSet};
pub use config::{GenerationConfig, WeightTable};
pub use error::{GeneratorError, GeneratorResult};
pub use metadata::{build_metadata, patch_placeholder, PatchReport, TokenMetadata, CID_PLACEHOLDER};
pub use output::{CollectionSummary, CollectionWriter};
pub use pools::{Presence, TraitCategory, TraitRegistry};
pub use prompt::render_prompt;
pub use rarity::RaritySchedule;
