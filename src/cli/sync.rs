use crate::{config, error, error::SyncError, info, service, success};

use super::progress::spinner;

pub async fn sync() {
    let pb = spinner("Reading top artists...");
    let result = service::sync_and_store(&config::data_dir()).await;
    pb.finish_and_clear();

    match result {
        Ok(profile) => {
            success!(
                "Synced profile for {}",
                profile.display_name.as_deref().unwrap_or(&profile.spotify_id)
            );
            if profile.top_genres.is_empty() {
                info!("No genres found in your top artists.");
            } else {
                info!("Top genres: {}", profile.top_genres.join(", "));
            }
        }
        Err(SyncError::Unauthorized) => {
            error!("Not authorized with Spotify. Run `moodlist auth` first.")
        }
        Err(e) => error!("Failed to sync user data. Err: {}", e),
    }
}
