//! Persisted data model: the store, per-song records and guess events.
//!
//! Field names serialize in camelCase so the blob stays compatible with
//! existing `songstats.json` files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One recorded attempt at naming a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessEvent {
    /// Milliseconds elapsed before the guess.
    pub time: i64,

    /// Whether the guess named the song.
    #[serde(default)]
    pub correct: bool,

    /// Creation instant in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
}

impl GuessEvent {
    /// Create an event stamped with the current wall-clock time.
    pub fn now(time: i64, correct: bool) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        Self {
            time,
            correct,
            timestamp,
        }
    }
}

/// Accumulated statistics for one song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRecord {
    /// Display name from the first guess ever recorded for the song.
    pub name: Option<String>,

    /// Artist from the first guess ever recorded for the song.
    pub artist: Option<String>,

    /// Every guess in arrival order.
    #[serde(default)]
    pub guesses: Vec<GuessEvent>,

    #[serde(default)]
    pub total_guesses: u64,

    #[serde(default)]
    pub correct_guesses: u64,

    /// Cached rounded mean of correct-guess times.
    #[serde(default)]
    pub average_time: i64,
}

impl SongRecord {
    /// Create an empty record with zeroed counters.
    pub fn new(name: Option<String>, artist: Option<String>) -> Self {
        Self {
            name,
            artist,
            guesses: Vec::new(),
            total_guesses: 0,
            correct_guesses: 0,
            average_time: 0,
        }
    }

    /// Times of the correct guesses, in arrival order.
    pub fn correct_times(&self) -> impl Iterator<Item = i64> + '_ {
        self.guesses.iter().filter(|g| g.correct).map(|g| g.time)
    }

    /// Rounded mean of correct-guess times derived from `guesses`.
    pub fn computed_average_time(&self) -> i64 {
        rounded_mean(self.correct_times())
    }

    /// Percentage of guesses that were correct, 0 when there are none.
    pub fn accuracy_rate(&self) -> i64 {
        percentage(self.correct_guesses, self.total_guesses)
    }

    /// Append a guess and bring the counters and cached average up to date.
    pub fn push(&mut self, event: GuessEvent) {
        if event.correct {
            self.correct_guesses += 1;
        }
        self.total_guesses += 1;
        self.guesses.push(event);
        self.average_time = self.computed_average_time();
    }
}

/// Root aggregate holding every song record and the global guess counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Song records in the order each song was first guessed.
    #[serde(default)]
    pub songs: IndexMap<String, SongRecord>,

    #[serde(default)]
    pub total_guesses: u64,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a song record.
    pub fn song(&self, song_id: &str) -> Option<&SongRecord> {
        self.songs.get(song_id)
    }
}

/// Round half up, the way the browser client rounds.
pub(crate) fn round_half_up(value: f64) -> i64 {
    // `as` saturates on overflow and maps NaN to 0.
    (value + 0.5).floor() as i64
}

/// Rounded arithmetic mean, 0 for an empty sequence.
pub(crate) fn rounded_mean(values: impl Iterator<Item = i64>) -> i64 {
    let (sum, count) = values.fold((0i128, 0u64), |(sum, count), v| {
        (sum + i128::from(v), count + 1)
    });
    if count == 0 {
        return 0;
    }
    round_half_up(sum as f64 / count as f64)
}

/// `round(100 * part / whole)`, 0 when `whole` is 0.
pub(crate) fn percentage(part: u64, whole: u64) -> i64 {
    if whole == 0 {
        return 0;
    }
    round_half_up(part as f64 / whole as f64 * 100.0)
}
