//! Job pipeline core logic

pub mod extract;
pub mod pipeline;

pub use extract::{default_strategies, extract_image_url, extract_with, ExtractionStrategy, ImagesAt};
pub use pipeline::JobPipeline;
