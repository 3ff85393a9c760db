//! Unified error type for the songguess library.
//!
//! Every statistics operation fails with one of three kinds: the caller sent
//! something unusable, the song is unknown, or the backing store could not be
//! read or written.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for all songguess operations.
///
/// # Example
///
/// ```ignore
/// use songguess::{Result, StatsService, MemoryBackend};
///
/// fn report(service: &StatsService<MemoryBackend>) -> Result<()> {
///     let report = service.song_stats("4uLU6hMCjMI75M1A2tKUQC")?;
///     println!("{}", report.stats.accuracy_rate);
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No record exists for the requested song.
    #[error("Song not found: {0}")]
    NotFound(String),

    /// The store could not be loaded or saved.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error from a message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns `true` if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` if this is a persistence error.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
