use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{Artist, GenerationRecord, HistoryTableRow};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Counts genre occurrences across `artists` and returns the `limit` most
/// frequent ones. Ties keep the order in which the genres were first seen.
pub fn top_genres(artists: &[Artist], limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for genre in artists.iter().flat_map(|a| a.genres.iter()) {
        let count = counts.entry(genre.as_str()).or_insert(0);
        if *count == 0 {
            order.push(genre.clone());
        }
        *count += 1;
    }

    // sort_by is stable, so equal counts stay in first-seen order
    order.sort_by(|a, b| counts[b.as_str()].cmp(&counts[a.as_str()]));
    order.truncate(limit);
    order
}

/// Returns at most the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn history_table_rows(records: &[GenerationRecord]) -> Vec<HistoryTableRow> {
    records
        .iter()
        .map(|r| HistoryTableRow {
            created: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            name: r.name.clone(),
            energy: r.mood_analysis.energy,
            tracks: r.track_ids.len(),
            prompt: truncate_chars(&r.prompt, 40).to_string(),
        })
        .collect()
}

/// Random 20 character alphanumeric id for stored records.
pub fn generate_record_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}
