use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, path::PathBuf, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, info, types::PkceToken};

/// State shared by all handlers of one server instance.
#[derive(Clone)]
pub struct AppState {
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
    pub data_dir: PathBuf,
    pub history_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pkce: Arc<Mutex<Option<PkceToken>>>, data_dir: PathBuf) -> Self {
        Self {
            pkce,
            data_dir,
            history_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/playlists", get(api::list_playlists))
        .route("/playlists/generate", post(api::generate))
        .route("/user/sync", post(api::sync_user))
        .layer(Extension(state))
}

pub async fn start_api_server(state: AppState) -> std::io::Result<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await
}
