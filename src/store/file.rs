//! JSON file backend.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::logging::{debug, error, info};
use crate::stats::Store;

use super::{Backend, StoreError};

/// Stores the snapshot as pretty-printed JSON in a single file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a half-written blob.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Use the file at `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the file at `path`, writing an empty store if it does not exist.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let backend = Self::new(path);
        if !backend.path.exists() {
            backend.save(&Store::new())?;
            info!(path = %backend.path.display(), "initialized stats file");
        }
        Ok(backend)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(dir)?;
        temp_file.write_all(bytes)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Backend for JsonFileBackend {
    fn load(&self) -> Result<Store, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Store::new()),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read stats file");
                return Err(e.into());
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to parse stats file");
            StoreError::from(e)
        })
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(store)?;
        self.write_atomic(&bytes).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to save stats file");
            e
        })?;
        debug!(path = %self.path.display(), songs = store.songs.len(), "saved stats file");
        Ok(())
    }
}
