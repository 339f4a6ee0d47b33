//! Per-item metadata documents and the content-identifier patch utility
//!
//! Documents follow the OpenSea metadata standard. The `image` field is
//! written with a placeholder CID until the images are pinned, after which
//! [`patch_placeholder`] rewrites it in every document.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::{process_debug, write_atomic, CollectionRecord, OutputLayout, ProcessId, TraitKind};
use tokio::fs;

use crate::error::{GeneratorError, GeneratorResult};

/// Token in `image` replaced by the real content identifier
pub const CID_PLACEHOLDER: &str = "YOUR_CID_HERE";

const COLLECTION_NAME: &str = "Chibi Agent";
const DESCRIPTION: &str = "A cute chibi secret agent from the 2000-piece Chibi Agent collection.";

/// Order of optional attributes after the `Rarity` entry
const OPTIONAL_ATTRIBUTE_ORDER: [TraitKind; 4] = [
    TraitKind::Accessory,
    TraitKind::Tattoo,
    TraitKind::Piercing,
    TraitKind::Freckles,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<MetadataAttribute>,
    /// Fields added by other tools are carried through a patch untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Build the metadata document for one record
pub fn build_metadata(record: &CollectionRecord) -> TokenMetadata {
    let mut attributes: Vec<MetadataAttribute> = TraitKind::MANDATORY
        .iter()
        .filter_map(|kind| {
            record.traits.get(*kind).map(|value| MetadataAttribute {
                trait_type: kind.display_name().to_string(),
                value: value.to_string(),
            })
        })
        .collect();

    attributes.push(MetadataAttribute {
        trait_type: "Rarity".to_string(),
        value: record.rarity.to_string(),
    });

    for kind in OPTIONAL_ATTRIBUTE_ORDER {
        if let Some(value) = record.traits.get(kind) {
            attributes.push(MetadataAttribute {
                trait_type: kind.display_name().to_string(),
                value: value.to_string(),
            });
        }
    }

    TokenMetadata {
        name: format!("{COLLECTION_NAME} #{}", record.token_id.padded()),
        description: DESCRIPTION.to_string(),
        image: format!("ipfs://{CID_PLACEHOLDER}/{}", OutputLayout::image_file_name(record.token_id)),
        attributes,
        extra: serde_json::Map::new(),
    }
}

/// Outcome of a placeholder patch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub scanned: usize,
    pub updated: usize,
}

/// Replace [`CID_PLACEHOLDER`] in the `image` field of every `*.json`
/// document under `metadata_dir`
///
/// Only documents whose value changes are rewritten, so a second pass with the
/// same identifier reports zero updates.
pub async fn patch_placeholder(metadata_dir: &Path, cid: &str) -> GeneratorResult<PatchReport> {
    let cid = cid.trim();
    if cid.is_empty() || cid.contains(char::is_whitespace) {
        return Err(GeneratorError::InvalidCid { input: cid.to_string() });
    }

    if !fs::try_exists(metadata_dir).await? {
        return Err(GeneratorError::MetadataDirMissing {
            path: metadata_dir.display().to_string(),
        });
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(metadata_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut report = PatchReport::default();
    for path in paths {
        report.scanned += 1;
        let content = fs::read_to_string(&path).await?;
        let mut document: TokenMetadata = serde_json::from_str(&content)?;

        let patched = document.image.replace(CID_PLACEHOLDER, cid);
        if patched == document.image {
            continue;
        }

        document.image = patched;
        let bytes = serde_json::to_string_pretty(&document)?.into_bytes();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &bytes))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;
        report.updated += 1;
        process_debug!(ProcessId::current(), "Patched {}", path.display());
    }

    Ok(report)
}
