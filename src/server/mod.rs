//! HTTP API server for songguess.
//!
//! This module exposes guess recording and statistics as JSON endpoints with
//! axum, plus the provider login redirect and OAuth callback.

mod config;
mod error;
mod logging;
mod routes;
mod state;

pub use config::{
    BackendKind, Config, ConfigError, CorsConfig, LogFormat, LoggingConfig, ServerConfig,
    StorageConfig,
};
pub use error::ApiError;
pub use logging::{LoggingError, init as init_logging};
pub use routes::router;
pub use state::{AppState, SharedStats, StateError};
