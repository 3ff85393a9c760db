//! Whole-blob persistence for the statistics [`Store`].
//!
//! A [`Backend`] only knows how to load and save an entire snapshot. The
//! [`StatsService`] layers the statistics operations on top and serializes
//! writes so concurrent ingests cannot lose each other's updates.
//!
//! [`Store`]: crate::stats::Store

mod error;
mod file;
#[cfg(feature = "kv")]
mod kv;
mod memory;
mod service;

pub use error::StoreError;
pub use file::JsonFileBackend;
#[cfg(feature = "kv")]
pub use kv::FjallBackend;
pub use memory::MemoryBackend;
pub use service::StatsService;

use std::sync::Arc;

use crate::stats::Store;

/// Storage with get/set-whole-blob semantics.
///
/// `load` on a backend that has never been written returns an empty store.
pub trait Backend: Send + Sync {
    /// Read the current snapshot.
    fn load(&self) -> Result<Store, StoreError>;

    /// Replace the stored snapshot.
    fn save(&self, store: &Store) -> Result<(), StoreError>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn load(&self) -> Result<Store, StoreError> {
        (**self).load()
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        (**self).save(store)
    }
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn load(&self) -> Result<Store, StoreError> {
        (**self).load()
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        (**self).save(store)
    }
}
