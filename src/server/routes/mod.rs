//! API routes and handlers.

mod auth;
mod stats;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/record-guess", post(stats::record_guess))
        .route("/song-stats/{song_id}", get(stats::song_stats))
        .route("/global-stats", get(stats::global_stats))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback));

    Router::new()
        .route("/health", get(health))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
