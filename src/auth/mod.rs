//! OAuth login proxy for the music provider.
//!
//! The provider owns both contracts: the authorize redirect and the
//! code-for-token exchange. This module only builds the former and performs
//! the latter. [`AuthGateway`] is the seam the HTTP layer depends on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default provider authorize endpoint.
pub const DEFAULT_AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";

/// Default provider token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";

/// Scopes needed for library access and in-browser playback.
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-library-read",
    "streaming",
    "user-read-email",
    "user-read-private",
    "user-read-playback-state",
    "user-modify-playback-state",
    "app-remote-control",
    "user-read-currently-playing",
    "user-read-recently-played",
];

/// Errors from the login flow.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider rejected the token request: {error}")]
    Provider {
        error: String,
        body: serde_json::Value,
    },

    #[error("Unexpected token response: {0}")]
    InvalidResponse(String),
}

/// OAuth client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_show_dialog")]
    pub show_dialog: bool,
    #[serde(default = "default_authorize_endpoint")]
    pub authorize_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_show_dialog() -> bool {
    true
}

fn default_authorize_endpoint() -> String {
    DEFAULT_AUTHORIZE_ENDPOINT.to_string()
}

fn default_token_endpoint() -> String {
    DEFAULT_TOKEN_ENDPOINT.to_string()
}

impl OAuthConfig {
    /// Fill empty credentials from `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`
    /// and `REDIRECT_URI`.
    pub fn with_env_fallback(mut self) -> Self {
        let fill = |field: &mut String, var: &str| {
            if field.is_empty() {
                if let Ok(value) = std::env::var(var) {
                    *field = value;
                }
            }
        };
        fill(&mut self.client_id, "SPOTIFY_CLIENT_ID");
        fill(&mut self.client_secret, "SPOTIFY_CLIENT_SECRET");
        fill(&mut self.redirect_uri, "REDIRECT_URI");
        self
    }
}

/// Token granted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// The two provider operations the server needs.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// URL the browser is redirected to for login.
    fn authorize_url(&self) -> Result<String, AuthError>;

    /// Trade an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError>;
}

/// [`AuthGateway`] backed by the provider's HTTP endpoints.
pub struct OAuthGateway {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl OAuthGateway {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AuthGateway for OAuthGateway {
    fn authorize_url(&self) -> Result<String, AuthError> {
        let scope = self.config.scopes.join(" ");
        let show_dialog = self.config.show_dialog.to_string();
        let url = Url::parse_with_params(
            &self.config.authorize_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("scope", scope.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("show_dialog", show_dialog.as_str()),
            ],
        )?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let response = self
            .http_client
            .post(&self.config.token_endpoint)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;
        if let Some(error) = body.get("error") {
            let error = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(AuthError::Provider { error, body });
        }

        serde_json::from_value(body).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}
