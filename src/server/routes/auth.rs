//! Login redirect and OAuth callback handlers.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

use super::super::{error::ApiError, state::AppState};

/// Query parameters the provider appends to the callback.
#[derive(Debug, Deserialize, Default)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Redirect the browser to the provider's login page.
pub async fn login(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let gateway = state.auth().ok_or_else(ApiError::auth_disabled)?;
    let url = gateway.authorize_url()?;
    tracing::debug!("redirecting to provider login");
    Ok(Redirect::to(&url))
}

/// Exchange the authorization code and hand the token to the browser.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Html<String>, ApiError> {
    let gateway = state.auth().ok_or_else(ApiError::auth_disabled)?;

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        let mut err = ApiError::validation("No code provided");
        if let Some(provider_error) = query.error {
            err = err.with_details(serde_json::json!({ "providerError": provider_error }));
        }
        return Err(err);
    };

    let token = gateway.exchange_code(&code).await?;
    tracing::info!("obtained access token");

    Ok(Html(token_handoff_page(&token.access_token)))
}

/// Page that stores the token and moves it into the URL fragment of `/`.
fn token_handoff_page(access_token: &str) -> String {
    // Escaped `<` so the token cannot close the script element.
    let token_literal = serde_json::Value::String(access_token.to_string())
        .to_string()
        .replace('<', "\\u003c");

    format!(
        r#"<!DOCTYPE html>
<html>
  <body>
    <script>
      const token = {token_literal};
      localStorage.setItem('spotify_access_token', token);
      window.location.href = '/#' + new URLSearchParams({{
        access_token: token
      }}).toString();
    </script>
    <p>Authenticating...</p>
  </body>
</html>
"#
    )
}
