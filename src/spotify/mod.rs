//! # Spotify Integration Module
//!
//! This module is the catalog side of the generator. It defines the
//! [`CatalogClient`] contract the track pool builder and publisher are written
//! against, the production [`SpotifyClient`] that fulfils it over the Spotify
//! Web API, and the OAuth 2.0 PKCE flow that obtains the access token.
//!
//! ## Architecture
//!
//! ```text
//! Generator (pool builder, publisher)
//!          ↓
//! CatalogClient trait
//!          ↓
//! SpotifyClient (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user
//! - `GET /me/top/tracks`, `GET /me/top/artists` - Listening history
//! - `GET /me/player/recently-played` - Recently played tracks
//! - `GET /search?type=track` - Mood search
//! - `GET /artists/{id}/related-artists` - Discovery candidates
//! - `GET /artists/{id}/top-tracks` - Discovery tracks
//! - `POST /users/{user_id}/playlists` - Create playlist
//! - `POST /playlists/{playlist_id}/tracks` - Append tracks
//! - `GET /playlists/{playlist_id}` - Full playlist
//!
//! ## Error Handling
//!
//! Every operation returns [`CatalogError`]. The client never retries; callers
//! decide whether a failure is fatal (required reads and all writes) or is
//! absorbed as an empty result (search and discovery fan-out).

use async_trait::async_trait;

use crate::{
    error::CatalogError,
    types::{Artist, Playlist, Track, User},
};

pub mod auth;
mod client;

pub use client::SpotifyClient;

/// Read/write operations against the music catalog on behalf of one user.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn get_current_user(&self) -> Result<User, CatalogError>;

    async fn get_top_tracks(&self, limit: u32) -> Result<Vec<Track>, CatalogError>;

    async fn get_top_artists(&self, limit: u32) -> Result<Vec<Artist>, CatalogError>;

    async fn get_recently_played(&self, limit: u32) -> Result<Vec<Track>, CatalogError>;

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError>;

    /// Artists similar to `artist_id`. Callers must tolerate failure.
    async fn get_related_artists(&self, artist_id: &str) -> Result<Vec<Artist>, CatalogError>;

    /// Most popular tracks of `artist_id`. Callers must tolerate failure.
    async fn get_artist_top_tracks(&self, artist_id: &str) -> Result<Vec<Track>, CatalogError>;

    /// Creates an empty private playlist owned by `user_id`.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, CatalogError>;

    /// Appends `uris` in order and returns the new snapshot id.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<String, CatalogError>;

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError>;
}
