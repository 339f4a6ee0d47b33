//! Collection descriptor loading

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use shared::ItemId;
use tokio::fs;

use crate::error::{OrchestratorError, OrchestratorResult};

/// The fields of a `full_collection.json` entry the image run needs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionEntry {
    pub token_id: ItemId,
    pub prompt: String,
    #[serde(default)]
    pub rarity: Option<String>,
}

/// Collection entries indexed by item id
#[derive(Debug, Clone, Default)]
pub struct CollectionIndex {
    entries: BTreeMap<ItemId, CollectionEntry>,
}

impl CollectionIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = CollectionEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.token_id, e)).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let entries: Vec<CollectionEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Read and index the descriptor at `path`
    pub async fn load(path: &Path) -> OrchestratorResult<Self> {
        let unreadable = |reason: String| OrchestratorError::CollectionUnreadable {
            path: path.display().to_string(),
            reason,
        };

        let json = fs::read_to_string(path).await.map_err(|e| unreadable(e.to_string()))?;
        Self::from_json_str(&json).map_err(|e| unreadable(e.to_string()))
    }

    pub fn get(&self, item_id: ItemId) -> Option<&CollectionEntry> {
        self.entries.get(&item_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
