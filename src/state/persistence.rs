//! Snapshot persistence.
//!
//! One JSON file per stack under the state directory. Writes go through a
//! temp file and rename so a crashed apply never leaves a half-written
//! snapshot behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::StackSnapshot;
use crate::error::{Error, Result};

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// A store rooted at the given directory. The directory is created on
    /// first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the snapshot file for a stack.
    pub fn snapshot_path(&self, stack: &str) -> PathBuf {
        self.dir.join(format!("{}.json", stack))
    }

    /// Load the recorded snapshot, if any.
    pub fn load(&self, stack: &str) -> Result<Option<StackSnapshot>> {
        let path = self.snapshot_path(stack);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::state_load(&path, e.to_string()))?;
        let snapshot: StackSnapshot = serde_json::from_str(&content)
            .map_err(|e| Error::state_load(&path, e.to_string()))?;
        Ok(Some(snapshot))
    }

    /// Persist a snapshot atomically.
    pub fn save(&self, snapshot: &StackSnapshot) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.snapshot_path(&snapshot.stack);
        let rendered = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&self.dir, &path, rendered.as_bytes())
            .map_err(|e| Error::state_store(&path, e.to_string()))
    }

    /// Remove a stack's snapshot. Returns whether one existed.
    pub fn remove(&self, stack: &str) -> Result<bool> {
        let path = self.snapshot_path(stack);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StackDocument;
    use crate::state::{AssetManifest, StackSnapshot};

    #[test]
    fn save_load_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state"));

        assert!(store.load("site-test").unwrap().is_none());

        let snapshot = StackSnapshot::record(
            StackDocument::new("site-test"),
            AssetManifest::new(),
        )
        .unwrap();
        store.save(&snapshot).unwrap();

        let loaded = store.load("site-test").unwrap().unwrap();
        assert_eq!(loaded.fingerprint, snapshot.fingerprint);

        assert!(store.remove("site-test").unwrap());
        assert!(!store.remove("site-test").unwrap());
    }
}
