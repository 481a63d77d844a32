use std::sync::Arc;

use tokio::sync::Mutex;

use crate::spotify;

/// Logs in with Spotify and stores the token for `generate`, `sync` and `serve`.
pub async fn auth() {
    spotify::auth::auth(Arc::new(Mutex::new(None))).await;
}
