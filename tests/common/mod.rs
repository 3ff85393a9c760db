//! Common test utilities and fixtures.
//!
//! This module provides a test application over a temporary stats file, a
//! scripted login gateway, and helpers for posting guesses.

#![cfg(feature = "server")]
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use tempfile::TempDir;

use songguess::auth::{AccessToken, AuthError, AuthGateway};
use songguess::server::{
    AppState, BackendKind, Config, CorsConfig, LoggingConfig, ServerConfig, StorageConfig, router,
};

// =============================================================================
// Login Gateway
// =============================================================================

/// Authorize URL returned by [`FakeGateway`].
pub const FAKE_AUTHORIZE_URL: &str =
    "https://accounts.example.com/authorize?response_type=code&client_id=test";

/// Gateway that answers from a script instead of calling the provider.
#[derive(Default)]
pub struct FakeGateway {
    /// Codes passed to `exchange_code`, in call order.
    pub exchanged: Mutex<Vec<String>>,
    /// Provider error to return instead of a token.
    pub reject_with: Option<String>,
}

#[async_trait]
impl AuthGateway for FakeGateway {
    fn authorize_url(&self) -> Result<String, AuthError> {
        Ok(FAKE_AUTHORIZE_URL.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        if let Ok(mut exchanged) = self.exchanged.lock() {
            exchanged.push(code.to_string());
        }

        if let Some(error) = &self.reject_with {
            return Err(AuthError::Provider {
                error: error.clone(),
                body: json!({ "error": error }),
            });
        }

        Ok(AccessToken {
            access_token: format!("token-for-{}", code),
            token_type: Some("Bearer".into()),
            expires_in: Some(3600),
            refresh_token: None,
            scope: None,
        })
    }
}

// =============================================================================
// Test Application
// =============================================================================

/// Test application wrapper that manages a temporary stats file.
pub struct TestApp {
    pub server: TestServer,
    pub stats_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive for test duration
}

impl TestApp {
    /// Create a new test application with a fresh stats file and login disabled.
    pub fn new() -> anyhow::Result<Self> {
        Self::build(None)
    }

    /// Create a test application whose login flow uses `gateway`.
    pub fn with_gateway(gateway: Arc<FakeGateway>) -> anyhow::Result<Self> {
        Self::build(Some(gateway))
    }

    fn build(gateway: Option<Arc<FakeGateway>>) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let stats_path = temp_dir.path().join("songstats.json");
        let config = Config {
            server: ServerConfig {
                bind: "127.0.0.1".into(),
                port: 0,
                static_path: None,
            },
            storage: StorageConfig {
                backend: BackendKind::File,
                path: stats_path.to_string_lossy().into(),
            },
            auth: None,
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
        };
        let state = AppState::from_config(&config)?
            .with_auth_gateway(gateway.map(|g| g as Arc<dyn AuthGateway>));
        let server = TestServer::new(router(state))?;
        Ok(Self {
            server,
            stats_path,
            _temp_dir: temp_dir,
        })
    }

    /// Post a guess and return the response body, asserting success.
    pub async fn record(
        &self,
        song_id: &str,
        name: &str,
        guess_time: i64,
        is_correct: bool,
    ) -> anyhow::Result<Value> {
        let response = self
            .server
            .post("/api/record-guess")
            .json(&json!({
                "songId": song_id,
                "songName": name,
                "artist": "Test Artist",
                "guessTime": guess_time,
                "isCorrect": is_correct,
            }))
            .await;
        response.assert_status_ok();
        Ok(response.json())
    }

    /// Post several correct guesses for one song.
    pub async fn record_correct_times(&self, song_id: &str, times: &[i64]) -> anyhow::Result<()> {
        for &time in times {
            self.record(song_id, song_id, time, true).await?;
        }
        Ok(())
    }

    /// Fetch a song report, asserting success.
    pub async fn song_stats(&self, song_id: &str) -> anyhow::Result<Value> {
        let response = self
            .server
            .get(&format!("/api/song-stats/{}", song_id))
            .await;
        response.assert_status(StatusCode::OK);
        Ok(response.json())
    }

    /// Read the persisted stats file.
    pub fn persisted(&self) -> anyhow::Result<Value> {
        let content = std::fs::read_to_string(&self.stats_path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Collect a `timeDistribution` array as `(time, count)` pairs.
pub fn buckets(report: &Value) -> Vec<(i64, u64)> {
    report["stats"]["timeDistribution"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|b| (b["time"].as_i64().unwrap_or(-1), b["count"].as_u64().unwrap_or(0)))
                .collect()
        })
        .unwrap_or_default()
}
