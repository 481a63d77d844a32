use chrono::{TimeZone, Utc};
use moodlist::mood::fallback_descriptor;
use moodlist::types::{Artist, GenerationRecord};
use moodlist::utils::*;

// Helper function to create a test artist
fn create_test_artist(id: &str, genres: &[&str]) -> Artist {
    Artist {
        id: id.to_string(),
        name: format!("{} name", id),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        images: vec![],
    }
}

fn create_test_record(id: &str, prompt: &str, track_count: usize) -> GenerationRecord {
    GenerationRecord {
        id: id.to_string(),
        user_id: "user".to_string(),
        spotify_playlist_id: format!("pl_{}", id),
        name: format!("calm vibes - {}", id),
        prompt: prompt.to_string(),
        mood_analysis: fallback_descriptor(&[]),
        track_ids: (0..track_count).map(|i| format!("t{}", i)).collect(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap(),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    assert_ne!(verifier, generate_code_verifier());
}

#[test]
fn test_generate_code_challenge_is_s256_base64url() {
    // RFC 7636 appendix B
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    assert!(!challenge.contains('='));
}

#[test]
fn test_top_genres_orders_by_count() {
    let artists = vec![
        create_test_artist("a1", &["indie", "pop"]),
        create_test_artist("a2", &["pop", "rock"]),
        create_test_artist("a3", &["pop", "rock", "jazz"]),
    ];

    assert_eq!(top_genres(&artists, 10), vec!["pop", "rock", "indie", "jazz"]);
    assert_eq!(top_genres(&artists, 2), vec!["pop", "rock"]);
}

#[test]
fn test_top_genres_ties_keep_first_seen_order() {
    let artists = vec![
        create_test_artist("a1", &["shoegaze"]),
        create_test_artist("a2", &["ambient"]),
        create_test_artist("a3", &["dream pop"]),
    ];

    assert_eq!(top_genres(&artists, 10), vec!["shoegaze", "ambient", "dream pop"]);
}

#[test]
fn test_top_genres_empty() {
    assert!(top_genres(&[], 10).is_empty());
    assert!(top_genres(&[create_test_artist("a", &[])], 10).is_empty());
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("hello", 10), "hello");
    assert_eq!(truncate_chars("hello", 3), "hel");
    assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
    assert_eq!(truncate_chars("", 5), "");
}

#[test]
fn test_history_table_rows() {
    let records = vec![
        create_test_record("r1", "short prompt", 25),
        create_test_record("r2", &"x".repeat(80), 0),
    ];
    let rows = history_table_rows(&records);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].created, "2024-03-09 18:30");
    assert_eq!(rows[0].tracks, 25);
    assert_eq!(rows[0].energy, 5);
    assert_eq!(rows[0].prompt, "short prompt");
    assert_eq!(rows[1].prompt.chars().count(), 40);
}

#[test]
fn test_generate_record_id() {
    let id = generate_record_id();
    assert_eq!(id.len(), 20);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(id, generate_record_id());
}
