//! Guess recording and statistics handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Serialize;

use crate::stats::{GlobalStatsReport, GuessSubmission, GuessSummary, SongStatsReport};

use super::super::{error::ApiError, state::AppState};

/// Response to a recorded guess.
#[derive(Debug, Serialize)]
pub struct RecordGuessResponse {
    pub success: bool,
    pub stats: GuessSummary,
}

/// Record one guess for a song.
pub async fn record_guess(
    State(state): State<AppState>,
    payload: Result<Json<GuessSubmission>, JsonRejection>,
) -> Result<Json<RecordGuessResponse>, ApiError> {
    let Json(submission) = payload?;
    let guess = submission
        .validate()
        .map_err(|e| ApiError::from_stats(e, "Server error recording guess"))?;

    let stats = state
        .stats()
        .record_guess(guess)
        .map_err(|e| ApiError::from_stats(e, "Server error recording guess"))?;

    Ok(Json(RecordGuessResponse {
        success: true,
        stats,
    }))
}

/// Statistics for one song.
pub async fn song_stats(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> Result<Json<SongStatsReport>, ApiError> {
    let report = state
        .stats()
        .song_stats(&song_id)
        .map_err(|e| ApiError::from_stats(e, "Server error getting song stats"))?;

    Ok(Json(report))
}

/// Statistics across all songs.
pub async fn global_stats(
    State(state): State<AppState>,
) -> Result<Json<GlobalStatsReport>, ApiError> {
    let report = state
        .stats()
        .global_stats()
        .map_err(|e| ApiError::from_stats(e, "Server error getting global stats"))?;

    Ok(Json(report))
}
