//! Error taxonomy for request-level operations.
//!
//! Only authorization failures, malformed prompts and failures of required
//! catalog calls reach the caller. Everything else the generator runs into is
//! absorbed with a documented substitute and logged as a warning.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the Spotify catalog client.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Spotify rejected the access token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited by Spotify")]
    RateLimited,

    #[error("Spotify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode Spotify response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

/// Errors raised by a mood analyzer. Never surfaced to the caller.
#[derive(Debug, Error)]
pub enum MoodError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Mood analysis is not configured: {0}")]
    NotConfigured(String),
}

/// Errors raised by the JSON stores in [`crate::management`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Request-level failure of `generate`.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid prompt")]
    InvalidPrompt,

    #[error("Catalog request failed: {0}")]
    Catalog(CatalogError),

    #[error("Failed to persist playlist: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<CatalogError> for GenerateError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unauthorized => GenerateError::Unauthorized,
            other => GenerateError::Catalog(other),
        }
    }
}

impl From<StoreError> for GenerateError {
    fn from(err: StoreError) -> Self {
        GenerateError::Persistence(err.to_string())
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GenerateError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            GenerateError::InvalidPrompt => (StatusCode::BAD_REQUEST, "Invalid prompt"),
            GenerateError::Catalog(_)
            | GenerateError::Persistence(_)
            | GenerateError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate playlist",
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Request-level failure of `sync_user`.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Catalog request failed: {0}")]
    Catalog(CatalogError),

    #[error("Failed to persist profile: {0}")]
    Persistence(#[from] StoreError),
}

impl From<CatalogError> for SyncError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unauthorized => SyncError::Unauthorized,
            other => SyncError::Catalog(other),
        }
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SyncError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            SyncError::Catalog(_) | SyncError::Persistence(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to sync user data",
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
