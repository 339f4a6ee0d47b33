//! Image artifact store with atomic writes
//!
//! Bytes go to a temporary file in the images directory and are renamed onto
//! `NNNN.png`, so the canonical path is either absent or complete.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::JobResult;
use crate::traits::ArtifactStore;
use shared::{process_debug, write_atomic, ItemId, OutputLayout, ProcessId};

/// Real [`ArtifactStore`] over the images directory of an output layout
pub struct RealArtifactStore {
    layout: OutputLayout,
}

impl RealArtifactStore {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    pub fn artifact_path(&self, item_id: ItemId) -> PathBuf {
        self.layout.image_path(item_id)
    }

    /// Create the images directory if needed
    pub async fn ensure_dir(&self) -> JobResult<()> {
        fs::create_dir_all(self.layout.images_dir()).await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for RealArtifactStore {
    async fn is_complete(&self, item_id: ItemId) -> bool {
        match fs::metadata(self.artifact_path(item_id)).await {
            Ok(metadata) => metadata.is_file() && metadata.len() > 0,
            Err(_) => false,
        }
    }

    async fn persist(&self, item_id: ItemId, bytes: &[u8]) -> JobResult<()> {
        self.ensure_dir().await?;

        let target = self.artifact_path(item_id);
        let bytes = bytes.to_vec();
        let destination = target.clone();

        tokio::task::spawn_blocking(move || write_atomic(&destination, &bytes))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

        process_debug!(ProcessId::current(), "Saved {}", target.display());
        Ok(())
    }
}
