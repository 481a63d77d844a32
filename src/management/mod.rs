mod auth;
mod history;
mod profile;

pub use auth::TokenManager;
pub use history::PlaylistHistoryManager;
pub use profile::UserProfileManager;
