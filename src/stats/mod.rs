//! Guess statistics: the persisted model, ingestion and reporting.
//!
//! Everything in this module is a pure function of a [`Store`] snapshot.
//! Loading and saving snapshots is the job of [`crate::store`].

mod histogram;
mod ingest;
mod model;
mod report;

pub use histogram::{
    BUCKET_WIDTH_MS, Bucket, MAX_HISTOGRAM_TIME_MS, Percentiles, bucket_of, time_distribution,
};
pub use ingest::{GuessSubmission, GuessSummary, NewGuess, apply_guess};
pub use model::{GuessEvent, SongRecord, Store};
pub use report::{
    GlobalStatsReport, SongStats, SongStatsReport, TOP_SONGS_LIMIT, TopSong, global_stats,
    song_stats,
};
