//! Mood Playlist Generator Library
//!
//! This library turns a free-text description of how a listener feels into a
//! Spotify playlist. The mood text is analyzed by a language model, the
//! listener's history is read from Spotify, and a track pool is blended from
//! three sources (taste-matched history, mood search, related-artist discovery)
//! before being shuffled and published back to the listener's account.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints served by the local web server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy for generation and sync requests
//! - `generator` - Track sourcing, allocation, shuffling and publishing
//! - `management` - Token, playlist history and user profile storage
//! - `mood` - Mood analysis contract, fallback and OpenAI implementation
//! - `server` - Local HTTP server wiring
//! - `service` - Request-level operations shared by the API and the CLI
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use moodlist::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> moodlist::Res<()> {
//!     config::load_env().await?;
//!     cli::sync().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod management;
pub mod mood;
pub mod server;
pub mod service;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI and configuration plumbing where the exact error type is
/// not interesting to the caller. Request paths use the typed errors from
/// [`error`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Syncing listening profile...");
/// info!("Found {} top tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist {} created", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only CLI code paths may use this macro. Request handlers running inside
/// the web server must return errors instead of terminating the process.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, including every failure the generator
/// absorbs (mood analysis fallback, failed searches, failed discovery calls).
///
/// # Example
///
/// ```
/// warning!("Related artists for {} unavailable: {}", artist_id, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
