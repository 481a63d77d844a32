//! The track pool and the three sourcing strategies that fill it.
//!
//! Sources run strictly one after another because each one consults the ids
//! already accepted. Inside a source, independent catalog calls run together
//! and every call that fails is treated as an empty result.

use std::collections::HashSet;

use futures::future::join_all;
use rand::Rng;

use super::{
    allocation::{self, SourceTargets},
    energy,
};
use crate::{spotify::CatalogClient, types::Track, warning};

pub const SEARCH_TERM_LIMIT: usize = 3;
pub const SEARCH_RESULTS_PER_TERM: u32 = 10;
pub const DISCOVERY_SEED_TRACKS: usize = 5;
pub const RELATED_ARTISTS_PER_SEED: usize = 3;
pub const DISCOVERY_ARTIST_LIMIT: usize = 5;

/// Deduplicated working set of candidate tracks for one request.
///
/// The first track inserted under an id wins; later duplicates are ignored.
/// Ids can also be marked as seen without entering the pool, which keeps a
/// later source from picking them up.
#[derive(Debug, Default)]
pub struct TrackPool {
    tracks: Vec<Track>,
    ids: HashSet<String>,
    seen: HashSet<String>,
}

impl TrackPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and leaves the pool untouched if the id is present.
    pub fn insert(&mut self, track: Track) -> bool {
        if !self.ids.insert(track.id.clone()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn mark_seen(&mut self, id: &str) {
        if !self.ids.contains(id) {
            self.seen.insert(id.to_string());
        }
    }

    /// In the pool, or offered by an earlier source and passed over.
    pub fn is_known(&self, id: &str) -> bool {
        self.ids.contains(id) || self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }
}

/// Number of tracks each source actually contributed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolYield {
    pub taste: usize,
    pub search: usize,
    pub discovery: usize,
}

pub struct TrackPoolBuilder<'a> {
    catalog: &'a dyn CatalogClient,
    targets: SourceTargets,
    pool: TrackPool,
    yields: PoolYield,
}

impl<'a> TrackPoolBuilder<'a> {
    pub fn new(catalog: &'a dyn CatalogClient, total: usize) -> Self {
        Self {
            catalog,
            targets: SourceTargets::for_size(total),
            pool: TrackPool::new(),
            yields: PoolYield::default(),
        }
    }

    /// Runs taste, search and discovery in that order.
    pub async fn build<R: Rng + Send>(
        mut self,
        top_tracks: &[Track],
        energy_level: u8,
        search_terms: &[String],
        rng: &mut R,
    ) -> (TrackPool, PoolYield) {
        self.add_taste_matched(top_tracks, energy_level, rng);
        self.add_mood_search(search_terms, rng).await;
        self.add_discovery(top_tracks, rng).await;
        self.finish()
    }

    /// Source 1: the listener's own top tracks, filtered by energy.
    ///
    /// The filtered sequence is cut at the taste target first; ids already in
    /// the pool are skipped afterwards. Input order is kept.
    pub fn add_taste_matched<R: Rng>(
        &mut self,
        top_tracks: &[Track],
        energy_level: u8,
        rng: &mut R,
    ) -> usize {
        let selected: Vec<&Track> = top_tracks
            .iter()
            .filter(|track| {
                allocation::accept_taste_track(energy::classify(track), energy_level, rng)
            })
            .take(self.targets.taste)
            .collect();

        let added = selected
            .into_iter()
            .filter(|track| self.pool.insert((*track).clone()))
            .count();

        self.yields.taste += added;
        added
    }

    /// Source 2: catalog search for the first three mood search terms.
    ///
    /// Every candidate is marked seen, picked or not, so discovery never
    /// brings back a search result that was shuffled out.
    pub async fn add_mood_search<R: Rng + Send>(
        &mut self,
        search_terms: &[String],
        rng: &mut R,
    ) -> usize {
        let catalog = self.catalog;
        let terms: Vec<&String> = search_terms.iter().take(SEARCH_TERM_LIMIT).collect();
        let results = join_all(
            terms
                .iter()
                .map(|term| catalog.search_tracks(term, SEARCH_RESULTS_PER_TERM)),
        )
        .await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<Track> = Vec::new();
        for (term, result) in terms.iter().zip(results) {
            let tracks = match result {
                Ok(tracks) => tracks,
                Err(e) => {
                    warning!("Search for \"{}\" failed: {}", term, e);
                    Vec::new()
                }
            };

            for track in tracks {
                if !self.pool.contains(&track.id) && seen.insert(track.id.clone()) {
                    candidates.push(track);
                }
            }
        }

        for track in &candidates {
            self.pool.mark_seen(&track.id);
        }

        let added = self.add_shuffled(candidates, self.targets.search, rng);
        self.yields.search += added;
        added
    }

    /// Source 3: top tracks of artists related to the listener's top artists.
    ///
    /// Fills whatever capacity is left. Every related-artist and artist
    /// top-tracks failure counts as an empty list, so this never fails.
    pub async fn add_discovery<R: Rng + Send>(
        &mut self,
        top_tracks: &[Track],
        rng: &mut R,
    ) -> usize {
        let target = self.targets.discovery(self.pool.len());
        if top_tracks.is_empty() || target == 0 {
            return 0;
        }

        let catalog = self.catalog;
        let seed_artist_ids = seed_artist_ids(top_tracks);

        let related = join_all(
            seed_artist_ids
                .iter()
                .map(|id| catalog.get_related_artists(id)),
        )
        .await;

        let candidate_artists: Vec<String> = seed_artist_ids
            .iter()
            .zip(related)
            .flat_map(|(id, result)| match result {
                Ok(artists) => artists
                    .into_iter()
                    .take(RELATED_ARTISTS_PER_SEED)
                    .map(|a| a.id)
                    .collect::<Vec<_>>(),
                Err(e) => {
                    warning!("Related artists for {} unavailable: {}", id, e);
                    Vec::new()
                }
            })
            .take(DISCOVERY_ARTIST_LIMIT)
            .collect();

        let top_track_results = join_all(
            candidate_artists
                .iter()
                .map(|id| catalog.get_artist_top_tracks(id)),
        )
        .await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<Track> = Vec::new();
        for (id, result) in candidate_artists.iter().zip(top_track_results) {
            let tracks = match result {
                Ok(tracks) => tracks,
                Err(e) => {
                    warning!("Top tracks for {} unavailable: {}", id, e);
                    Vec::new()
                }
            };

            for track in tracks {
                if !self.pool.is_known(&track.id) && seen.insert(track.id.clone()) {
                    candidates.push(track);
                }
            }
        }

        let added = self.add_shuffled(candidates, target, rng);
        self.yields.discovery += added;
        added
    }

    pub fn finish(self) -> (TrackPool, PoolYield) {
        (self.pool, self.yields)
    }

    fn add_shuffled<R: Rng>(
        &mut self,
        candidates: Vec<Track>,
        target: usize,
        rng: &mut R,
    ) -> usize {
        allocation::shuffle_and_take(candidates, target, rng)
            .into_iter()
            .filter(|track| self.pool.insert(track.clone()))
            .count()
    }
}

/// First-listed artist ids of the first five distinct top tracks, in order of
/// first appearance and without duplicates.
///
/// Repeated track ids are skipped before counting five so a repeated entry
/// cannot take a seed slot. Spotify top tracks do not repeat, so for real
/// input this is the same as taking the first five.
pub fn seed_artist_ids(top_tracks: &[Track]) -> Vec<String> {
    let mut seen_tracks: HashSet<&str> = HashSet::new();
    let mut seen_artists: HashSet<&str> = HashSet::new();

    top_tracks
        .iter()
        .filter(|t| seen_tracks.insert(t.id.as_str()))
        .take(DISCOVERY_SEED_TRACKS)
        .filter_map(|t| t.first_artist().and_then(|a| a.id.as_deref()))
        .filter(|id| seen_artists.insert(*id))
        .map(str::to_string)
        .collect()
}
