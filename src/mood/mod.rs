//! Mood analysis: free text in, [`MoodDescriptor`] out.
//!
//! The analyzer is an opaque collaborator behind the [`MoodAnalyzer`] trait.
//! Its failures never reach the caller: [`analyze_mood`] substitutes the fixed
//! [`fallback_descriptor`] so generation can carry on.

use async_trait::async_trait;

use crate::{
    error::MoodError,
    types::{MoodDescriptor, PrimaryMood},
    warning,
};

mod openai;

pub use openai::OpenAiMoodAnalyzer;

pub const MIN_ENERGY: u8 = 1;
pub const MAX_ENERGY: u8 = 10;

const FALLBACK_ENERGY: u8 = 5;
const FALLBACK_GENRE_COUNT: usize = 3;
const FALLBACK_SEARCH_TERMS: [&str; 3] = ["chill vibes", "relaxing music", "ambient"];
const FALLBACK_ARTIST_STYLES: [&str; 3] = ["Bon Iver", "James Blake", "The xx"];

#[async_trait]
pub trait MoodAnalyzer: Send + Sync {
    /// Reads `prompt` into a descriptor. `known_genres` are the listener's
    /// preferred genres and may be suggested to the model.
    async fn analyze(
        &self,
        prompt: &str,
        known_genres: &[String],
    ) -> Result<MoodDescriptor, MoodError>;
}

/// Descriptor used whenever mood analysis fails.
pub fn fallback_descriptor(known_genres: &[String]) -> MoodDescriptor {
    MoodDescriptor {
        primary_mood: PrimaryMood::Calm,
        energy: FALLBACK_ENERGY,
        genres: known_genres
            .iter()
            .take(FALLBACK_GENRE_COUNT)
            .cloned()
            .collect(),
        search_terms: FALLBACK_SEARCH_TERMS.iter().map(|s| s.to_string()).collect(),
        artist_styles: FALLBACK_ARTIST_STYLES
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

/// Runs `analyzer`, falling back to [`fallback_descriptor`] on any error.
pub async fn analyze_mood(
    analyzer: &dyn MoodAnalyzer,
    prompt: &str,
    known_genres: &[String],
) -> MoodDescriptor {
    match analyzer.analyze(prompt, known_genres).await {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warning!("Mood analysis failed, using calm fallback: {}", e);
            fallback_descriptor(known_genres)
        }
    }
}

/// Rejects descriptors whose energy is outside `1..=10`.
pub fn validate_descriptor(descriptor: MoodDescriptor) -> Result<MoodDescriptor, MoodError> {
    if !(MIN_ENERGY..=MAX_ENERGY).contains(&descriptor.energy) {
        return Err(MoodError::InvalidResponse(format!(
            "energy {} outside {}..={}",
            descriptor.energy, MIN_ENERGY, MAX_ENERGY
        )));
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAnalyzer;

    #[async_trait]
    impl MoodAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _: &str, _: &[String]) -> Result<MoodDescriptor, MoodError> {
            Err(MoodError::Connection("offline".to_string()))
        }
    }

    struct CannedAnalyzer(MoodDescriptor);

    #[async_trait]
    impl MoodAnalyzer for CannedAnalyzer {
        async fn analyze(&self, _: &str, _: &[String]) -> Result<MoodDescriptor, MoodError> {
            Ok(self.0.clone())
        }
    }

    fn genres(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failure_yields_exact_fallback() {
        let known = genres(&["pop", "indie", "rock", "jazz"]);
        let descriptor = analyze_mood(&FailingAnalyzer, "rainy sunday", &known).await;

        assert_eq!(descriptor.primary_mood, PrimaryMood::Calm);
        assert_eq!(descriptor.energy, 5);
        assert_eq!(descriptor.genres, genres(&["pop", "indie", "rock"]));
        assert_eq!(
            descriptor.search_terms,
            genres(&["chill vibes", "relaxing music", "ambient"])
        );
        assert_eq!(
            descriptor.artist_styles,
            genres(&["Bon Iver", "James Blake", "The xx"])
        );
    }

    #[tokio::test]
    async fn test_fallback_with_no_known_genres() {
        let descriptor = analyze_mood(&FailingAnalyzer, "rainy sunday", &[]).await;
        assert!(descriptor.genres.is_empty());
    }

    #[tokio::test]
    async fn test_success_passes_descriptor_through() {
        let canned = MoodDescriptor {
            primary_mood: PrimaryMood::Energetic,
            energy: 9,
            genres: genres(&["edm"]),
            search_terms: genres(&["workout motivation"]),
            artist_styles: genres(&["Daft Punk"]),
        };
        let descriptor =
            analyze_mood(&CannedAnalyzer(canned.clone()), "workout", &genres(&["pop"])).await;
        assert_eq!(descriptor, canned);
    }

    #[test]
    fn test_validate_rejects_out_of_range_energy() {
        let mut descriptor = fallback_descriptor(&[]);
        descriptor.energy = 0;
        assert!(validate_descriptor(descriptor.clone()).is_err());
        descriptor.energy = 11;
        assert!(validate_descriptor(descriptor.clone()).is_err());
        descriptor.energy = 10;
        assert!(validate_descriptor(descriptor).is_ok());
    }

    #[test]
    fn test_descriptor_json_shape() {
        let descriptor: MoodDescriptor = serde_json::from_str(
            r#"{"primaryMood":"nostalgic","energy":4,"genres":["indie"],"searchTerms":["90s throwback"],"artistStyles":["Oasis"]}"#,
        )
        .unwrap();
        assert_eq!(descriptor.primary_mood, PrimaryMood::Nostalgic);

        let other: MoodDescriptor =
            serde_json::from_str(r#"{"primaryMood":"dreamy","energy":3}"#).unwrap();
        assert_eq!(other.primary_mood, PrimaryMood::Other("dreamy".to_string()));
        assert_eq!(other.primary_mood.to_string(), "dreamy");
        assert!(other.search_terms.is_empty());
    }
}
