//! Guess-timing statistics for a guess-the-song game.
//!
//! Players submit timed guesses per song; this library folds them into a
//! persisted store and derives per-song and global summaries, including a
//! 500 ms timing histogram of correct guesses.
//!
//! # Quick Start
//!
//! ```ignore
//! use songguess::prelude::*;
//!
//! let service = StatsService::new(JsonFileBackend::init("songstats.json")?);
//!
//! service.record_guess(NewGuess::new("4uLU6hMCjMI75M1A2tKUQC", 1830, true))?;
//! let report = service.song_stats("4uLU6hMCjMI75M1A2tKUQC")?;
//! let global = service.global_stats()?;
//! ```
//!
//! # Modules
//!
//! - [`stats`] - Data model, ingestion and reports (always available)
//! - [`store`] - Whole-blob backends and the write-serializing service
//! - [`auth`] - OAuth login proxy (requires `server` feature)
//! - [`server`] - HTTP API server (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `kv` - Enable the fjall-backed store (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `server` - Enable the HTTP API server
//! - `full` - Enable all features
//!
//! # Testing
//!
//! The HTTP API suite (`tests/server_tests.rs`) is compiled only with the
//! `server` feature; a plain `cargo test` runs the library and property tests.
//!
//! ```text
//! cargo test --features server
//! cargo test --all-features
//! ```

#[cfg(feature = "server")]
pub mod auth;
mod logging;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod stats;
pub mod store;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export the statistics types at crate root for convenience
pub use stats::{
    Bucket, GlobalStatsReport, GuessEvent, GuessSubmission, GuessSummary, NewGuess, Percentiles,
    SongRecord, SongStats, SongStatsReport, Store, TopSong,
};

// Re-export storage types at crate root for convenience
#[cfg(feature = "kv")]
pub use store::FjallBackend;
pub use store::{Backend, JsonFileBackend, MemoryBackend, StatsService, StoreError};
