//! # CLI Module
//!
//! User-facing commands of moodlist. Every command is a thin shell around
//! [`crate::service`]: it shows a spinner while the network work runs, then
//! prints the result with the logging macros. Commands that cannot continue
//! terminate through [`crate::error!`].
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE login through the local callback server
//! - [`sync`] - Recompute the top genres used to steer mood analysis
//! - [`generate`] - Create a playlist from a free-text mood description
//! - [`history`] - Table of previously generated playlists
//! - [`serve`] - Run the HTTP API in the foreground
//!
//! ## Typical Session
//!
//! ```bash
//! moodlist auth
//! moodlist sync
//! moodlist generate "need energy for a morning workout"
//! moodlist history --limit 5
//! ```

mod auth;
mod generate;
mod history;
mod progress;
mod serve;
mod sync;

pub use auth::auth;
pub use generate::generate;
pub use history::history;
pub use serve::serve;
pub use sync::sync;
