//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use songguess::prelude::*;
//!
//! let service = StatsService::new(MemoryBackend::new());
//! service.record_guess(NewGuess::new("abc", 900, true))?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Statistics model and reports
pub use crate::stats::{
    GlobalStatsReport, GuessSubmission, GuessSummary, NewGuess, SongStatsReport, Store,
};

// Storage
#[cfg(feature = "kv")]
pub use crate::store::FjallBackend;
pub use crate::store::{Backend, JsonFileBackend, MemoryBackend, StatsService, StoreError};
