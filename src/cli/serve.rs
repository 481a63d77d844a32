use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config, error,
    server::{AppState, start_api_server},
};

/// Runs the HTTP server in the foreground until it fails or is interrupted.
pub async fn serve() {
    let state = AppState::new(Arc::new(Mutex::new(None)), config::data_dir());
    if let Err(e) = start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
