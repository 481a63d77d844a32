//! # API Module
//!
//! HTTP endpoints of the moodlist web server.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /login`, starts the Spotify OAuth 2.0 PKCE flow
//! - [`callback`] - `GET /callback`, exchanges the authorization code and
//!   stores the token
//!
//! ### Playlists
//!
//! - [`generate`] - `POST /playlists/generate` with `{"prompt": "..."}`.
//!   Responds with the generated playlist, `400 {"error":"Invalid prompt"}`,
//!   `401 {"error":"Unauthorized"}` or `500 {"error":"Failed to generate playlist"}`.
//! - [`list_playlists`] - `GET /playlists`, stored history newest first
//!
//! ### Profile
//!
//! - [`sync_user`] - `POST /user/sync`, refreshes the top genres used as
//!   mood-analysis input
//!
//! ### Monitoring
//!
//! - [`health`] - status and version
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use moodlist::server::{AppState, router};
//!
//! let app = router(AppState::new(Default::default(), config::data_dir()));
//! ```

mod callback;
mod health;
mod playlists;
mod user;

pub use callback::{callback, login};
pub use health::health;
pub use playlists::{generate, list_playlists};
pub use user::sync_user;
