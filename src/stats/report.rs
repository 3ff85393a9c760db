//! Read-only reports derived from a store snapshot.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::histogram::{Bucket, Percentiles, time_distribution};
use super::model::{SongRecord, Store, percentage, rounded_mean};

/// Number of entries in the global leaderboard.
pub const TOP_SONGS_LIMIT: usize = 10;

/// Point-in-time summary for one song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongStatsReport {
    pub song_id: String,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub stats: SongStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongStats {
    pub total_guesses: u64,
    pub correct_guesses: u64,
    pub accuracy_rate: i64,
    pub average_time: i64,
    pub time_distribution: Vec<Bucket>,
    pub percentiles: Option<Percentiles>,
}

/// Cross-song summary with the most-attempted songs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatsReport {
    pub total_songs: usize,
    pub total_guesses: u64,
    pub total_correct_guesses: u64,
    pub global_accuracy_rate: i64,
    pub global_average_time: i64,
    pub top_songs: Vec<TopSong>,
}

/// Leaderboard projection of a song record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSong {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub total_guesses: u64,
    pub correct_guesses: u64,
    pub average_time: i64,
}

impl From<&SongRecord> for TopSong {
    fn from(record: &SongRecord) -> Self {
        Self {
            name: record.name.clone(),
            artist: record.artist.clone(),
            total_guesses: record.total_guesses,
            correct_guesses: record.correct_guesses,
            average_time: record.average_time,
        }
    }
}

/// Summarize one song, or [`Error::NotFound`] if it has never been guessed.
pub fn song_stats(store: &Store, song_id: &str) -> Result<SongStatsReport> {
    let record = store
        .song(song_id)
        .ok_or_else(|| Error::NotFound(song_id.to_string()))?;

    let mut times: Vec<i64> = record.correct_times().collect();
    times.sort_unstable();

    Ok(SongStatsReport {
        song_id: song_id.to_string(),
        name: record.name.clone(),
        artist: record.artist.clone(),
        stats: SongStats {
            total_guesses: record.total_guesses,
            correct_guesses: record.correct_guesses,
            accuracy_rate: record.accuracy_rate(),
            average_time: record.average_time,
            time_distribution: time_distribution(&times),
            percentiles: Percentiles::from_sorted(&times),
        },
    })
}

/// Summarize the whole store.
pub fn global_stats(store: &Store) -> GlobalStatsReport {
    let total_correct_guesses = store.songs.values().map(|s| s.correct_guesses).sum();
    let global_average_time =
        rounded_mean(store.songs.values().flat_map(|s| s.correct_times()));

    let mut ranked: Vec<&SongRecord> = store.songs.values().collect();
    // Stable, so ties keep the order songs were first recorded.
    ranked.sort_by(|a, b| b.total_guesses.cmp(&a.total_guesses));

    GlobalStatsReport {
        total_songs: store.songs.len(),
        total_guesses: store.total_guesses,
        total_correct_guesses,
        global_accuracy_rate: percentage(total_correct_guesses, store.total_guesses),
        global_average_time,
        top_songs: ranked
            .into_iter()
            .take(TOP_SONGS_LIMIT)
            .map(TopSong::from)
            .collect(),
    }
}
