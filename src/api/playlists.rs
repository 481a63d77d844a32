use axum::{
    Extension, Json, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::{
    error::GenerateError,
    server::AppState,
    service,
    types::{GeneratedPlaylist, GenerationRecord},
    warning,
};

/// A body that is not JSON, or whose `prompt` is missing or not a string, is
/// answered like a blank prompt.
pub async fn generate(
    Extension(state): Extension<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GeneratedPlaylist>, GenerateError> {
    let prompt = body
        .ok()
        .and_then(|Json(body)| body.get("prompt").and_then(Value::as_str).map(str::to_string))
        .ok_or(GenerateError::InvalidPrompt)?;

    match service::generate_and_store(&state.data_dir, &prompt, &state.history_lock).await {
        Ok(generated) => Ok(Json(generated)),
        Err(e) => {
            warning!("Error generating playlist: {}", e);
            Err(e)
        }
    }
}

pub async fn list_playlists(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<GenerationRecord>>, impl IntoResponse> {
    match service::history(&state.data_dir).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            warning!("Error loading playlist history: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to load playlists" })),
            ))
        }
    }
}
