use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{management::TokenManager, server::AppState, spotify, warning};

/// Starts the PKCE flow and redirects the browser to Spotify.
pub async fn login(Extension(state): Extension<AppState>) -> Response {
    match spotify::auth::begin_login(&state.pkce).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            warning!("Cannot start login: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h4>Login is not configured.</h4>"),
            )
                .into_response()
        }
    }
}

/// Completes the PKCE flow and stores the token for later requests.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut pkce = state.pkce.lock().await;
    let Some(pkce_state) = pkce.as_mut() else {
        return Html("<h4>Missing PKCE code verifier.</h4>");
    };

    let verifier = pkce_state.code_verifier.clone();

    match spotify::auth::exchange_code_pkce(code, &verifier).await {
        Ok(token) => {
            pkce_state.token = Some(token.clone());
            if let Err(e) = TokenManager::new(token, state.data_dir.clone())
                .persist()
                .await
            {
                warning!("Failed to save token: {}", e);
                return Html("<h4>Login succeeded but the token could not be saved.</h4>");
            }
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
