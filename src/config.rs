//! Configuration management for the mood playlist generator.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, the OpenAI key, server settings
//! and the playlist size.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "user-read-private user-read-email user-top-read user-read-recently-played playlist-modify-public playlist-modify-private";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-1106";
pub const DEFAULT_PLAYLIST_SIZE: usize = 25;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is not
/// an error: the process environment is used as-is in that case.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/moodlist/.env`
/// - macOS: `~/Library/Application Support/moodlist/.env`
/// - Windows: `%LOCALAPPDATA%/moodlist/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of everything the application persists: token, history, profile.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodlist");
    path
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn with_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the address the web server binds to, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> String {
    with_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID registered on the developer dashboard.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings and point at this server's `/callback` route. Defaults to the
/// callback on [`server_addr`].
pub fn spotify_redirect_uri() -> String {
    with_default(
        "SPOTIFY_API_REDIRECT_URI",
        &format!("http://{}/callback", server_addr()),
    )
}

/// Returns the space-separated OAuth scopes requested during login.
pub fn spotify_scope() -> String {
    with_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    with_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    with_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    with_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Returns the OpenAI API key used for mood analysis.
///
/// # Security Note
///
/// The key should be kept confidential and never exposed in logs or version
/// control.
pub fn openai_api_key() -> Result<String, ConfigError> {
    required("OPENAI_API_KEY")
}

pub fn openai_api_url() -> String {
    with_default("OPENAI_API_URL", DEFAULT_OPENAI_API_URL)
}

pub fn openai_model() -> String {
    with_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL)
}

/// Returns the number of tracks a generated playlist aims for.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if `PLAYLIST_SIZE` is set but is not a
/// positive integer.
pub fn playlist_size() -> Result<usize, ConfigError> {
    match env::var("PLAYLIST_SIZE") {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(ConfigError::Invalid {
                key: "PLAYLIST_SIZE",
                value: raw,
            }),
        },
        _ => Ok(DEFAULT_PLAYLIST_SIZE),
    }
}
