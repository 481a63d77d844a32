//! Request-level operations shared by the HTTP API and the CLI.
//!
//! These functions wire the stores in [`crate::management`] to the catalog
//! client and the generator. Each call builds its own catalog client from the
//! stored token; nothing is shared between requests except the history file,
//! whose writes are serialized through the lock the caller passes in.

use std::path::Path;

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;

use crate::{
    config,
    error::{CatalogError, GenerateError, StoreError, SyncError},
    generator::{self, PlaylistGenerator},
    management::{PlaylistHistoryManager, TokenManager, UserProfileManager},
    mood::OpenAiMoodAnalyzer,
    spotify::{CatalogClient, SpotifyClient},
    types::{GeneratedPlaylist, GenerationRecord, UserProfile},
    utils, warning,
};

pub const TOP_ARTISTS_LIMIT: u32 = 50;
pub const TOP_GENRES_LIMIT: usize = 10;

/// Builds a catalog client from the stored token, refreshing it if needed.
///
/// A missing token or a failed refresh is reported as
/// [`CatalogError::Unauthorized`].
pub async fn catalog_client(data_dir: &Path) -> Result<SpotifyClient, CatalogError> {
    let mut token_mgr = TokenManager::load(data_dir).await.map_err(|e| {
        warning!("No stored Spotify token, run moodlist auth. Error: {}", e);
        CatalogError::Unauthorized
    })?;

    let token = token_mgr.get_valid_token().await.map_err(|e| {
        warning!("Failed to refresh Spotify token: {}", e);
        CatalogError::Unauthorized
    })?;

    Ok(SpotifyClient::new(token))
}

/// Recomputes the listener's profile from their top artists.
pub async fn sync_profile(catalog: &dyn CatalogClient) -> Result<UserProfile, CatalogError> {
    let top_artists = catalog.get_top_artists(TOP_ARTISTS_LIMIT).await?;
    let top_genres = utils::top_genres(&top_artists, TOP_GENRES_LIMIT);
    let user = catalog.get_current_user().await?;

    Ok(UserProfile {
        spotify_id: user.id,
        display_name: user.display_name,
        top_genres,
        last_sync: Utc::now(),
    })
}

pub async fn sync_and_store(data_dir: &Path) -> Result<UserProfile, SyncError> {
    let catalog = catalog_client(data_dir).await?;
    let profile = sync_profile(&catalog).await?;

    let mut profile_mgr = UserProfileManager::new(None, data_dir);
    profile_mgr.set_profile(profile.clone());
    profile_mgr.persist().await?;

    Ok(profile)
}

/// Appends `record` to the playlist history under `history_lock`.
pub async fn store_generation(
    data_dir: &Path,
    record: GenerationRecord,
    history_lock: &Mutex<()>,
) -> Result<(), StoreError> {
    let _guard = history_lock.lock().await;
    let mut history = PlaylistHistoryManager::load(data_dir).await?;
    history.add_record(record);
    history.persist().await
}

/// Full generation request: validate, generate, publish, store.
pub async fn generate_and_store(
    data_dir: &Path,
    prompt: &str,
    history_lock: &Mutex<()>,
) -> Result<GeneratedPlaylist, GenerateError> {
    generator::validate_prompt(prompt)?;

    let target_size = config::playlist_size()?;

    let catalog = catalog_client(data_dir).await?;
    let analyzer = OpenAiMoodAnalyzer::from_env();

    let known_genres = match UserProfileManager::load(data_dir).await {
        Ok(mgr) => mgr.top_genres(),
        Err(e) => {
            warning!("Stored profile unreadable, continuing without genres: {}", e);
            Vec::new()
        }
    };

    let mut rng = StdRng::from_os_rng();
    let generated = PlaylistGenerator::new(&catalog, &analyzer)
        .with_target_size(target_size)
        .generate(prompt, &known_genres, &mut rng)
        .await?;

    store_generation(data_dir, generated.record.clone(), history_lock).await?;
    Ok(generated)
}

/// Stored playlists, newest first.
pub async fn history(data_dir: &Path) -> Result<Vec<GenerationRecord>, StoreError> {
    Ok(PlaylistHistoryManager::load(data_dir).await?.all())
}
