use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config, error,
    error::ConfigError,
    management::TokenManager,
    server::{AppState, start_api_server},
    success,
    types::{PkceToken, Token},
    utils, warning,
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Builds the Spotify authorization URL for a PKCE code challenge.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if no client id is configured.
pub fn authorize_url(code_challenge: &str) -> Result<String, ConfigError> {
    Ok(format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = &config::spotify_client_id()?,
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = &config::spotify_scope().replace(' ', "%20")
    ))
}

/// Starts a PKCE login and returns the URL the user has to visit.
///
/// The code verifier is stored in `shared_state` so the `/callback` handler
/// can complete the exchange.
pub async fn begin_login(
    shared_state: &Arc<Mutex<Option<PkceToken>>>,
) -> Result<String, ConfigError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let auth_url = authorize_url(&code_challenge)?;

    let mut lock = shared_state.lock().await;
    *lock = Some(PkceToken {
        code_verifier,
        token: None,
    });

    Ok(auth_url)
}

/// Runs the complete OAuth 2.0 PKCE flow from the command line.
///
/// 1. Generates the code verifier and challenge
/// 2. Starts the local web server so `/callback` can receive the code
/// 3. Opens the authorization URL in the default browser
/// 4. Waits up to 60 seconds for the callback to store a token
/// 5. Persists the token for the server and the other commands
///
/// Browser launch failures only print the URL. Any other failure terminates
/// the program with an error message.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let auth_url = match begin_login(&shared_state).await {
        Ok(url) => url,
        Err(e) => error!("Cannot start authentication: {}", e),
    };

    let server_state = AppState::new(Arc::clone(&shared_state), config::data_dir());
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(shared_state).await {
        Some(t) => {
            let token_manager = TokenManager::new(t, config::data_dir());
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token: {}", e);
            }

            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

/// Polls `shared_state` once per second until the callback stored a token,
/// giving up after 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may or may not rotate the refresh token; when the response carries
/// none, the one passed in is kept.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &client_id),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;

    let json: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
    Ok(json.into_token(Some(refresh_token)))
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// The verifier must be the one whose challenge was sent in the authorization
/// request. Authorization codes are single-use and expire after minutes.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;

    let json: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
    Ok(json.into_token(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_keeps_previous_refresh_token() {
        let res: TokenResponse =
            serde_json::from_str(r#"{"access_token":"new","expires_in":1800}"#).unwrap();
        let token = res.into_token(Some("old-refresh"));

        assert_eq!(token.access_token, "new");
        assert_eq!(token.refresh_token, "old-refresh");
        assert_eq!(token.expires_in, 1800);
    }

    #[test]
    fn test_token_response_defaults_expiry() {
        let res: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","scope":"user-top-read"}"#,
        )
        .unwrap();
        let token = res.into_token(None);

        assert_eq!(token.refresh_token, "r");
        assert_eq!(token.scope, "user-top-read");
        assert_eq!(token.expires_in, 3600);
    }
}
