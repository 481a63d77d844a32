use axum::{Extension, Json};
use serde_json::{Value, json};

use crate::{error::SyncError, server::AppState, service, warning};

pub async fn sync_user(Extension(state): Extension<AppState>) -> Result<Json<Value>, SyncError> {
    match service::sync_and_store(&state.data_dir).await {
        Ok(profile) => Ok(Json(json!({
            "topGenres": profile.top_genres.clone(),
            "user": profile,
        }))),
        Err(e) => {
            warning!("Error syncing user data: {}", e);
            Err(e)
        }
    }
}
