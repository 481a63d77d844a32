//! Keyword heuristic standing in for real audio energy analysis.
//!
//! Only the track name and the first listed artist's name are looked at. This
//! is a coarse proxy, not a measurement.

use crate::types::Track;

pub const HIGH_ENERGY_WORDS: [&str; 6] = ["party", "dance", "pump", "hype", "rock", "metal"];
pub const LOW_ENERGY_WORDS: [&str; 6] = ["sleep", "calm", "relax", "chill", "ambient", "quiet"];

/// Both flags may be set at once, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyProfile {
    pub prefers_high: bool,
    pub prefers_low: bool,
}

impl EnergyProfile {
    pub fn is_neutral(&self) -> bool {
        !self.prefers_high && !self.prefers_low
    }
}

pub fn classify(track: &Track) -> EnergyProfile {
    let artist = track.first_artist().map(|a| a.name.as_str()).unwrap_or("");
    classify_text(&track.name, artist)
}

/// Substring match of the keyword sets against `"{name} {artist}"`, lower-cased.
pub fn classify_text(track_name: &str, artist_name: &str) -> EnergyProfile {
    let haystack = format!("{} {}", track_name, artist_name).to_lowercase();

    EnergyProfile {
        prefers_high: HIGH_ENERGY_WORDS.iter().any(|w| haystack.contains(w)),
        prefers_low: LOW_ENERGY_WORDS.iter().any(|w| haystack.contains(w)),
    }
}
