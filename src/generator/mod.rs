//! # Playlist Generator
//!
//! Core of the application: from a mood prompt to a published playlist.
//!
//! ```text
//! prompt ─► mood analysis ─► MoodDescriptor
//!                               │
//! top tracks ───────────────────┤
//!                               ▼
//!            TrackPoolBuilder: taste (40%) ─► search (30%) ─► discovery (rest)
//!                               │
//!                               ▼
//!                 final shuffle + truncate ─► publish ─► GeneratedPlaylist
//! ```
//!
//! ## Randomness
//!
//! Every random decision (the 30% taste fallback and all shuffles) draws from
//! the `rng` handed to [`PlaylistGenerator::generate`]. The server passes an
//! OS-seeded `StdRng`; tests pass a fixed seed.
//!
//! ## Failure Policy
//!
//! - Blank or over-long prompts are rejected before any network call.
//! - Mood analysis failures fall back to a calm descriptor.
//! - Search and discovery failures shrink their source's contribution.
//! - Failing to read top tracks or the current user, or to create, fill or
//!   fetch the playlist, fails the whole request.

use chrono::{Local, Utc};
use rand::Rng;

use crate::{
    config,
    error::GenerateError,
    info,
    mood::{self, MoodAnalyzer},
    spotify::CatalogClient,
    types::{GeneratedPlaylist, GenerationRecord, PlaylistRequest},
    utils, warning,
};

pub mod allocation;
pub mod energy;
pub mod pool;
pub mod publish;

pub use pool::{PoolYield, TrackPool, TrackPoolBuilder};

pub const TOP_TRACKS_LIMIT: u32 = 50;
pub const RECENTLY_PLAYED_LIMIT: u32 = 50;
pub const MAX_PROMPT_CHARS: usize = 500;

/// Trims `prompt` and checks it is non-empty and at most 500 characters.
pub fn validate_prompt(prompt: &str) -> Result<String, GenerateError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(GenerateError::InvalidPrompt);
    }
    Ok(trimmed.to_string())
}

pub struct PlaylistGenerator<'a> {
    catalog: &'a dyn CatalogClient,
    analyzer: &'a dyn MoodAnalyzer,
    target_size: usize,
}

impl<'a> PlaylistGenerator<'a> {
    pub fn new(catalog: &'a dyn CatalogClient, analyzer: &'a dyn MoodAnalyzer) -> Self {
        Self {
            catalog,
            analyzer,
            target_size: config::DEFAULT_PLAYLIST_SIZE,
        }
    }

    pub fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }

    /// Validates `prompt` into a request for this generator's target size.
    pub fn request(
        &self,
        prompt: &str,
        known_genres: &[String],
    ) -> Result<PlaylistRequest, GenerateError> {
        Ok(PlaylistRequest {
            prompt: validate_prompt(prompt)?,
            target_size: self.target_size,
            known_genres: known_genres.to_vec(),
        })
    }

    /// Generates and publishes a playlist. The returned record is not stored;
    /// persisting it is up to the caller.
    pub async fn generate<R: Rng + Send>(
        &self,
        prompt: &str,
        known_genres: &[String],
        rng: &mut R,
    ) -> Result<GeneratedPlaylist, GenerateError> {
        let request = self.request(prompt, known_genres)?;

        let descriptor =
            mood::analyze_mood(self.analyzer, &request.prompt, &request.known_genres).await;
        info!(
            "Mood: {} (energy {}/10), {} search terms",
            descriptor.primary_mood,
            descriptor.energy,
            descriptor.search_terms.len()
        );

        let (top_tracks, recently_played, user) = tokio::join!(
            self.catalog.get_top_tracks(TOP_TRACKS_LIMIT),
            self.catalog.get_recently_played(RECENTLY_PLAYED_LIMIT),
            self.catalog.get_current_user(),
        );
        let top_tracks = top_tracks?;
        let user = user?;
        match recently_played {
            Ok(tracks) => info!("Listener has {} recently played tracks", tracks.len()),
            Err(e) => warning!("Recently played tracks unavailable: {}", e),
        }

        let (pool, yields) = TrackPoolBuilder::new(self.catalog, request.target_size)
            .build(
                &top_tracks,
                descriptor.energy,
                &descriptor.search_terms,
                rng,
            )
            .await;
        info!(
            "Track pool: {} taste, {} search, {} discovery",
            yields.taste, yields.search, yields.discovery
        );

        if pool.is_empty() {
            warning!("No candidate tracks found, the playlist will be empty");
        }

        let tracks = allocation::finalize(pool, request.target_size, rng);

        let name = publish::playlist_name(&descriptor, Local::now().date_naive());
        let description = publish::playlist_description(&request.prompt, &descriptor);
        let playlist =
            publish::publish(self.catalog, &user.id, &name, &description, &tracks).await?;

        let record = GenerationRecord {
            id: utils::generate_record_id(),
            user_id: user.id,
            spotify_playlist_id: playlist.id.clone(),
            name,
            prompt: request.prompt,
            mood_analysis: descriptor,
            track_ids: tracks.iter().map(|t| t.id.clone()).collect(),
            created_at: Utc::now(),
        };

        Ok(GeneratedPlaylist {
            record,
            playlist,
            tracks,
        })
    }
}
