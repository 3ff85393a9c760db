//! Process-local backend.

use std::sync::RwLock;

use crate::stats::Store;

use super::{Backend, StoreError};

/// Keeps the snapshot in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: RwLock<Store>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot.
    pub fn with_store(store: Store) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Store, StoreError> {
        let guard = self.store.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        let mut guard = self.store.write().map_err(|_| StoreError::Poisoned)?;
        *guard = store.clone();
        Ok(())
    }
}
