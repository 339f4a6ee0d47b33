//! On-disk output layout shared by the generator, the image runner and the
//! metadata patcher

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::types::ItemId;

/// Resolves every artifact path under one output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub const DEFAULT_ROOT: &'static str = "output";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self) -> PathBuf {
        self.root.join("full_collection.json")
    }

    pub fn prompts_path(&self) -> PathBuf {
        self.root.join("prompts_only.txt")
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join("metadata")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn metadata_path(&self, id: ItemId) -> PathBuf {
        self.metadata_dir().join(format!("{}.json", id.padded()))
    }

    pub fn image_path(&self, id: ItemId) -> PathBuf {
        self.images_dir().join(Self::image_file_name(id))
    }

    pub fn image_file_name(id: ItemId) -> String {
        format!("{}.png", id.padded())
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}

/// Write `bytes` to `path` through a temporary sibling file and a rename
///
/// Readers see either the previous content or the complete new content,
/// never a partial write. Blocking; async callers run it on the blocking pool.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::Builder::new().prefix(".partial-").tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
