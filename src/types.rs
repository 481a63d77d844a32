use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A playable track as returned by the catalog. Never mutated after fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    #[serde(default)]
    pub album: TrackAlbum,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
}

impl Track {
    pub fn first_artist(&self) -> Option<&TrackArtist> {
        self.artists.first()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedArtistsResponse {
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistTopTracksResponse {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    #[serde(default)]
    pub played_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

/// Primary mood label produced by mood analysis.
///
/// The model is asked for one of the eight named moods, but any other label it
/// returns is kept verbatim in [`PrimaryMood::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrimaryMood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Angry,
    Nostalgic,
    Confident,
    Anxious,
    Other(String),
}

impl fmt::Display for PrimaryMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimaryMood::Happy => "happy",
            PrimaryMood::Sad => "sad",
            PrimaryMood::Energetic => "energetic",
            PrimaryMood::Calm => "calm",
            PrimaryMood::Angry => "angry",
            PrimaryMood::Nostalgic => "nostalgic",
            PrimaryMood::Confident => "confident",
            PrimaryMood::Anxious => "anxious",
            PrimaryMood::Other(label) => label,
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PrimaryMood {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "happy" => PrimaryMood::Happy,
            "sad" => PrimaryMood::Sad,
            "energetic" => PrimaryMood::Energetic,
            "calm" => PrimaryMood::Calm,
            "angry" => PrimaryMood::Angry,
            "nostalgic" => PrimaryMood::Nostalgic,
            "confident" => PrimaryMood::Confident,
            "anxious" => PrimaryMood::Anxious,
            _ => PrimaryMood::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for PrimaryMood {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(mood) => mood,
            Err(never) => match never {},
        }
    }
}

impl From<PrimaryMood> for String {
    fn from(value: PrimaryMood) -> Self {
        value.to_string()
    }
}

/// Structured reading of a free-text mood prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodDescriptor {
    pub primary_mood: PrimaryMood,
    #[serde(deserialize_with = "deserialize_energy")]
    pub energy: u8,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub search_terms: Vec<String>,
    #[serde(default)]
    pub artist_styles: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnergyValue {
    Number(f64),
    Text(String),
}

/// Accepts any JSON number or numeric string and rounds it. Range checks are
/// left to mood validation; values beyond `u8` saturate so they still fail it.
fn deserialize_energy<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match EnergyValue::deserialize(deserializer)? {
        EnergyValue::Number(n) => n,
        EnergyValue::Text(s) => s.trim().parse::<f64>().map_err(de::Error::custom)?,
    };

    if !value.is_finite() {
        return Err(de::Error::custom("energy must be a finite number"));
    }
    Ok(value.round().clamp(0.0, f64::from(u8::MAX)) as u8)
}

/// One generation request after validation.
#[derive(Debug, Clone)]
pub struct PlaylistRequest {
    pub prompt: String,
    pub target_size: usize,
    pub known_genres: Vec<String>,
}

/// Record of a published playlist. Written once and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub id: String,
    pub user_id: String,
    pub spotify_playlist_id: String,
    pub name: String,
    pub prompt: String,
    pub mood_analysis: MoodDescriptor,
    pub track_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlaylist {
    #[serde(flatten)]
    pub record: GenerationRecord,
    pub playlist: Playlist,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub spotify_id: String,
    pub display_name: Option<String>,
    pub top_genres: Vec<String>,
    pub last_sync: DateTime<Utc>,
}

#[derive(Tabled)]
pub struct HistoryTableRow {
    pub created: String,
    pub name: String,
    pub energy: u8,
    pub tracks: usize,
    pub prompt: String,
}
