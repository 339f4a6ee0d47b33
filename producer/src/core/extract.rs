//! Image reference extraction from job result payloads
//!
//! Models on the queue disagree on where they put their output, so each known
//! layout is an [`ExtractionStrategy`] and the first one yielding a non-empty
//! image list wins.

use serde_json::Value;

use crate::error::{JobError, JobResult};

/// Locates the image list inside a result payload
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Non-empty image list, if this layout applies
    fn images<'a>(&self, payload: &'a Value) -> Option<&'a Vec<Value>>;
}

/// `images` at the top level, optionally below a container key
pub struct ImagesAt {
    container: Option<&'static str>,
}

impl ImagesAt {
    pub const fn top_level() -> Self {
        Self { container: None }
    }

    pub const fn nested(container: &'static str) -> Self {
        Self {
            container: Some(container),
        }
    }
}

impl ExtractionStrategy for ImagesAt {
    fn name(&self) -> &'static str {
        match self.container {
            None => "images",
            Some("output") => "output.images",
            Some("data") => "data.images",
            Some(_) => "nested images",
        }
    }

    fn images<'a>(&self, payload: &'a Value) -> Option<&'a Vec<Value>> {
        let root = match self.container {
            Some(key) => payload.get(key)?,
            None => payload,
        };
        root.get("images")?.as_array().filter(|images| !images.is_empty())
    }
}

static DEFAULT_STRATEGIES: [ImagesAt; 3] = [ImagesAt::top_level(), ImagesAt::nested("output"), ImagesAt::nested("data")];

/// Ordered strategies tried by [`extract_image_url`]
pub fn default_strategies() -> Vec<&'static dyn ExtractionStrategy> {
    DEFAULT_STRATEGIES.iter().map(|s| s as &dyn ExtractionStrategy).collect()
}

/// Reference of the first image in `payload`
///
/// The first entry is either a bare string or an object with a `url` field.
pub fn extract_image_url(payload: &Value) -> JobResult<String> {
    extract_with(payload, &default_strategies())
}

pub fn extract_with(payload: &Value, strategies: &[&dyn ExtractionStrategy]) -> JobResult<String> {
    let images = strategies
        .iter()
        .find_map(|strategy| strategy.images(payload))
        .ok_or_else(|| JobError::shape(format!("no images in response: {}", preview(payload))))?;

    let first = &images[0];
    let url = match first {
        Value::String(url) => Some(url.as_str()),
        Value::Object(entry) => entry.get("url").and_then(Value::as_str),
        _ => None,
    };

    url.filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| JobError::shape(format!("no URL in image entry: {first}")))
}

fn preview(payload: &Value) -> String {
    let text = payload.to_string();
    match text.char_indices().nth(500) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
