//! Guess ingestion: validating a submission and folding it into the store.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{Error, Result};

use super::model::{GuessEvent, SongRecord, Store, round_half_up};

/// A guess as submitted by a client, before validation.
///
/// Fields are kept as raw JSON so that loosely typed clients are coerced
/// during validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessSubmission {
    pub song_id: Option<Value>,
    pub song_name: Option<Value>,
    pub artist: Option<Value>,
    pub guess_time: Option<Value>,
    pub is_correct: Option<Value>,
}

impl GuessSubmission {
    /// Check the required fields and produce a [`NewGuess`].
    ///
    /// `songId` must be a non-empty string or a non-zero number and
    /// `guessTime` must be a JSON number. The time is not range-checked;
    /// fractional values are rounded. `isCorrect` follows JavaScript
    /// truthiness.
    pub fn validate(self) -> Result<NewGuess> {
        let song_id = self.song_id.as_ref().and_then(song_key);
        let time = self.guess_time.as_ref().and_then(json_number_to_millis);

        let (Some(song_id), Some(time)) = (song_id, time) else {
            return Err(Error::validation("Missing required fields"));
        };

        Ok(NewGuess {
            song_id,
            song_name: self.song_name.as_ref().and_then(display_text),
            artist: self.artist.as_ref().and_then(display_text),
            time,
            correct: self.is_correct.as_ref().is_some_and(is_truthy),
        })
    }
}

fn json_number_to_millis(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| n.as_f64().map(round_half_up))
}

/// Store key for a submitted song id. Falsy and composite ids are rejected.
fn song_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if is_truthy(value) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Name or artist text. Scalars are stringified; null and composites are dropped.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Render a number the way a browser would, without a trailing `.0`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A validated guess ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuess {
    pub song_id: String,
    pub song_name: Option<String>,
    pub artist: Option<String>,
    pub time: i64,
    pub correct: bool,
}

impl NewGuess {
    /// Convenience constructor for a guess without display metadata.
    pub fn new(song_id: impl Into<String>, time: i64, correct: bool) -> Self {
        Self {
            song_id: song_id.into(),
            song_name: None,
            artist: None,
            time,
            correct,
        }
    }

    /// Attach the song name and artist used if this is the song's first guess.
    pub fn with_metadata(mut self, name: impl Into<String>, artist: impl Into<String>) -> Self {
        self.song_name = Some(name.into());
        self.artist = Some(artist.into());
        self
    }
}

/// Post-ingest counters for the affected song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessSummary {
    pub total_guesses: u64,
    pub correct_guesses: u64,
    pub average_time: i64,
}

impl From<&SongRecord> for GuessSummary {
    fn from(record: &SongRecord) -> Self {
        Self {
            total_guesses: record.total_guesses,
            correct_guesses: record.correct_guesses,
            average_time: record.average_time,
        }
    }
}

/// Fold one guess into the store.
///
/// Name and artist are only taken from the guess that creates the record.
pub fn apply_guess(store: &mut Store, guess: NewGuess) -> Result<GuessSummary> {
    if guess.song_id.is_empty() {
        return Err(Error::validation("Missing required fields"));
    }

    let NewGuess {
        song_id,
        song_name,
        artist,
        time,
        correct,
    } = guess;

    let record = store
        .songs
        .entry(song_id)
        .or_insert_with(|| SongRecord::new(song_name, artist));
    record.push(GuessEvent::now(time, correct));
    store.total_guesses += 1;

    Ok(GuessSummary::from(&*record))
}
