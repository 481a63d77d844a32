use axum::response::Json;
use serde_json::{Value, json};

use crate::config;

/// Liveness plus whether mood analysis can reach a model. Without an
/// OpenAI key every playlist uses the calm fallback mood.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "moodAnalysis": config::openai_api_key().is_ok(),
    }))
}
