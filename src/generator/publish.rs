//! Turns the final track list into a playlist on the listener's account.

use chrono::NaiveDate;

use crate::{
    error::CatalogError,
    spotify::CatalogClient,
    types::{MoodDescriptor, Playlist, Track},
    utils,
};

pub const PROMPT_ECHO_CHARS: usize = 100;

/// `"{mood} vibes - {M/D/YYYY}"`
pub fn playlist_name(descriptor: &MoodDescriptor, date: NaiveDate) -> String {
    format!(
        "{mood} vibes - {date}",
        mood = descriptor.primary_mood,
        date = date.format("%-m/%-d/%Y")
    )
}

pub fn playlist_description(prompt: &str, descriptor: &MoodDescriptor) -> String {
    format!(
        "Generated from: \"{prompt}...\" | Energy: {energy}/10",
        prompt = utils::truncate_chars(prompt, PROMPT_ECHO_CHARS),
        energy = descriptor.energy
    )
}

/// Creates the playlist, appends `tracks` in order and returns the playlist
/// as the catalog reports it afterwards.
///
/// Any failure here is fatal to the request; a playlist that was created but
/// could not be filled is left as is.
pub async fn publish(
    catalog: &dyn CatalogClient,
    user_id: &str,
    name: &str,
    description: &str,
    tracks: &[Track],
) -> Result<Playlist, CatalogError> {
    let created = catalog.create_playlist(user_id, name, description).await?;

    let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
    if !uris.is_empty() {
        catalog.add_tracks(&created.id, &uris).await?;
    }

    catalog.get_playlist(&created.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::fallback_descriptor;

    #[test]
    fn test_playlist_name_uses_mood_and_short_date() {
        let descriptor = fallback_descriptor(&[]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(playlist_name(&descriptor, date), "calm vibes - 3/7/2024");
    }

    #[test]
    fn test_description_truncates_prompt() {
        let descriptor = fallback_descriptor(&[]);
        let prompt = "x".repeat(150);
        let description = playlist_description(&prompt, &descriptor);
        assert_eq!(
            description,
            format!("Generated from: \"{}...\" | Energy: 5/10", "x".repeat(100))
        );
    }

    #[test]
    fn test_description_short_prompt() {
        let descriptor = fallback_descriptor(&[]);
        assert_eq!(
            playlist_description("long day at work", &descriptor),
            "Generated from: \"long day at work...\" | Energy: 5/10"
        );
    }
}
