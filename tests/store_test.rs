use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::Mutex;

use moodlist::{
    error::{CatalogError, GenerateError, SyncError},
    management::{PlaylistHistoryManager, UserProfileManager},
    mood::fallback_descriptor,
    service,
    spotify::CatalogClient,
    types::{Artist, GenerationRecord, Playlist, Track, User, UserProfile},
};

fn record(id: &str, user_id: &str, minutes: i64) -> GenerationRecord {
    GenerationRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        spotify_playlist_id: format!("pl_{}", id),
        name: format!("calm vibes - {}", id),
        prompt: "quiet evening".to_string(),
        mood_analysis: fallback_descriptor(&[]),
        track_ids: vec!["t1".to_string(), "t2".to_string()],
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
            + Duration::minutes(minutes),
    }
}

#[tokio::test]
async fn test_history_round_trip_newest_first() {
    let dir = tempfile::tempdir().unwrap();

    let mut history = PlaylistHistoryManager::load(dir.path()).await.unwrap();
    assert!(history.all().is_empty());

    history
        .add_record(record("old", "u1", 0))
        .add_record(record("new", "u1", 30))
        .add_record(record("other", "u2", 10))
        .add_record(record("old", "u1", 60));
    history.persist().await.unwrap();

    let loaded = PlaylistHistoryManager::load(dir.path()).await.unwrap();

    // the duplicate "old" was ignored
    let ids: Vec<String> = loaded.all().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["new", "other", "old"]);

    // stored camelCase, as served by the API
    let raw = std::fs::read_to_string(dir.path().join("playlists/history.json")).unwrap();
    assert!(raw.contains("\"spotifyPlaylistId\""));
    assert!(raw.contains("\"primaryMood\": \"calm\""));
}

#[tokio::test]
async fn test_concurrent_store_generation_keeps_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let lock = Arc::new(Mutex::new(()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let path = dir.path().to_path_buf();
            let lock = Arc::clone(&lock);
            tokio::spawn(async move {
                service::store_generation(&path, record(&format!("r{}", i), "u", i), &lock).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = service::history(dir.path()).await.unwrap();
    assert_eq!(history.len(), 8);
    assert_eq!(history[0].id, "r7");
}

#[tokio::test]
async fn test_profile_missing_then_stored() {
    let dir = tempfile::tempdir().unwrap();

    let empty = UserProfileManager::load(dir.path()).await.unwrap();
    assert!(empty.profile().is_none());
    assert!(empty.top_genres().is_empty());

    let mut mgr = UserProfileManager::new(None, dir.path());
    mgr.set_profile(UserProfile {
        spotify_id: "u1".to_string(),
        display_name: Some("Listener".to_string()),
        top_genres: vec!["indie".to_string(), "jazz".to_string()],
        last_sync: Utc::now(),
    });
    mgr.persist().await.unwrap();

    let loaded = UserProfileManager::load(dir.path()).await.unwrap();
    assert_eq!(loaded.top_genres(), vec!["indie", "jazz"]);
    assert_eq!(loaded.profile().map(|p| p.spotify_id.as_str()), Some("u1"));
}

struct ProfileCatalog;

#[async_trait]
impl CatalogClient for ProfileCatalog {
    async fn get_current_user(&self) -> Result<User, CatalogError> {
        Ok(User {
            id: "u1".to_string(),
            display_name: None,
            email: None,
        })
    }

    async fn get_top_tracks(&self, _: u32) -> Result<Vec<Track>, CatalogError> {
        Ok(vec![])
    }

    async fn get_top_artists(&self, limit: u32) -> Result<Vec<Artist>, CatalogError> {
        assert_eq!(limit, 50);
        let artist = |id: &str, genres: &[&str]| Artist {
            id: id.to_string(),
            name: id.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            images: vec![],
        };
        Ok(vec![
            artist("a1", &["folk", "indie"]),
            artist("a2", &["indie"]),
            artist("a3", &["jazz", "folk", "indie"]),
        ])
    }

    async fn get_recently_played(&self, _: u32) -> Result<Vec<Track>, CatalogError> {
        Ok(vec![])
    }

    async fn search_tracks(&self, _: &str, _: u32) -> Result<Vec<Track>, CatalogError> {
        Ok(vec![])
    }

    async fn get_related_artists(&self, _: &str) -> Result<Vec<Artist>, CatalogError> {
        Ok(vec![])
    }

    async fn get_artist_top_tracks(&self, _: &str) -> Result<Vec<Track>, CatalogError> {
        Ok(vec![])
    }

    async fn create_playlist(&self, _: &str, _: &str, _: &str) -> Result<Playlist, CatalogError> {
        Err(CatalogError::Unauthorized)
    }

    async fn add_tracks(&self, _: &str, _: &[String]) -> Result<String, CatalogError> {
        Err(CatalogError::Unauthorized)
    }

    async fn get_playlist(&self, _: &str) -> Result<Playlist, CatalogError> {
        Err(CatalogError::Unauthorized)
    }
}

#[tokio::test]
async fn test_sync_profile_counts_genres() {
    let profile = service::sync_profile(&ProfileCatalog).await.unwrap();

    assert_eq!(profile.spotify_id, "u1");
    assert_eq!(profile.top_genres, vec!["indie", "folk", "jazz"]);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let lock = Mutex::new(());

    let generated = service::generate_and_store(dir.path(), "late night drive", &lock).await;
    assert!(matches!(generated, Err(GenerateError::Unauthorized)));

    let synced = service::sync_and_store(dir.path()).await;
    assert!(matches!(synced, Err(SyncError::Unauthorized)));

    assert!(service::history(dir.path()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_prompt_rejected_before_token_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let lock = Mutex::new(());

    let result = service::generate_and_store(dir.path(), "   ", &lock).await;
    assert!(matches!(result, Err(GenerateError::InvalidPrompt)));
}
