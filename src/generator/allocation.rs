//! Per-source target counts, randomized selection and final assembly.

use rand::{Rng, seq::SliceRandom};

use super::{energy::EnergyProfile, pool::TrackPool};
use crate::types::Track;

/// Chance that a taste track failing every energy rule is kept anyway.
pub const TASTE_FALLBACK_PROBABILITY: f64 = 0.3;

pub const HIGH_ENERGY_THRESHOLD: u8 = 7;
pub const LOW_ENERGY_THRESHOLD: u8 = 3;

/// How many tracks each source may contribute to a playlist of `total` tracks.
///
/// Taste gets 40% and search 30%, both rounded down. Discovery fills whatever
/// the first two sources left over, so the three targets always sum to `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceTargets {
    pub total: usize,
    pub taste: usize,
    pub search: usize,
}

impl SourceTargets {
    pub fn for_size(total: usize) -> Self {
        Self {
            total,
            taste: total * 4 / 10,
            search: total * 3 / 10,
        }
    }

    /// Remaining capacity once `pool_len` tracks are in the pool.
    pub fn discovery(&self, pool_len: usize) -> usize {
        self.total.saturating_sub(pool_len)
    }
}

/// Energy rules that include a taste track without a random draw.
///
/// Energy of exactly 3 or 7 is outside the neutral band, so a neutral track at
/// those levels only gets in through the random fallback.
pub fn matches_energy(profile: EnergyProfile, energy: u8) -> bool {
    (energy >= HIGH_ENERGY_THRESHOLD && profile.prefers_high)
        || (energy <= LOW_ENERGY_THRESHOLD && profile.prefers_low)
        || (energy > LOW_ENERGY_THRESHOLD && energy < HIGH_ENERGY_THRESHOLD && profile.is_neutral())
}

/// [`matches_energy`], or failing that a [`TASTE_FALLBACK_PROBABILITY`] draw.
pub fn accept_taste_track<R: Rng>(profile: EnergyProfile, energy: u8, rng: &mut R) -> bool {
    matches_energy(profile, energy) || rng.random::<f64>() < TASTE_FALLBACK_PROBABILITY
}

/// Fisher-Yates shuffles `tracks` and keeps the first `n`.
pub fn shuffle_and_take<R: Rng>(mut tracks: Vec<Track>, n: usize, rng: &mut R) -> Vec<Track> {
    tracks.shuffle(rng);
    tracks.truncate(n);
    tracks
}

/// Shuffles the whole pool once more and caps it at `total` tracks.
///
/// Which source a track came from has no influence on its final position.
pub fn finalize<R: Rng>(pool: TrackPool, total: usize, rng: &mut R) -> Vec<Track> {
    shuffle_and_take(pool.into_tracks(), total, rng)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const HIGH: EnergyProfile = EnergyProfile {
        prefers_high: true,
        prefers_low: false,
    };
    const LOW: EnergyProfile = EnergyProfile {
        prefers_high: false,
        prefers_low: true,
    };
    const NEUTRAL: EnergyProfile = EnergyProfile {
        prefers_high: false,
        prefers_low: false,
    };

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: format!("t{}", i),
                name: format!("Track {}", i),
                uri: format!("spotify:track:t{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_targets_for_default_size() {
        let targets = SourceTargets::for_size(25);
        assert_eq!(targets.taste, 10);
        assert_eq!(targets.search, 7);
        assert_eq!(targets.discovery(17), 8);
        assert_eq!(targets.taste + targets.search + targets.discovery(17), 25);
    }

    #[test]
    fn test_targets_round_down() {
        let targets = SourceTargets::for_size(9);
        assert_eq!(targets.taste, 3);
        assert_eq!(targets.search, 2);
        assert_eq!(targets.discovery(30), 0);
    }

    #[test]
    fn test_energy_rules() {
        assert!(matches_energy(HIGH, 8));
        assert!(matches_energy(HIGH, 7));
        assert!(!matches_energy(HIGH, 2));
        assert!(matches_energy(LOW, 2));
        assert!(matches_energy(LOW, 3));
        assert!(!matches_energy(LOW, 9));
        assert!(matches_energy(NEUTRAL, 5));
        assert!(!matches_energy(NEUTRAL, 3));
        assert!(!matches_energy(NEUTRAL, 7));
    }

    #[test]
    fn test_both_flags_only_match_at_extremes() {
        let both = EnergyProfile {
            prefers_high: true,
            prefers_low: true,
        };
        assert!(matches_energy(both, 9));
        assert!(matches_energy(both, 1));
        assert!(!matches_energy(both, 5));
    }

    #[test]
    fn test_deterministic_match_never_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(accept_taste_track(HIGH, 8, &mut rng));
        }
    }

    #[test]
    fn test_fallback_rate_is_near_thirty_percent() {
        let mut rng = StdRng::seed_from_u64(42);
        let accepted = (0..10_000)
            .filter(|_| accept_taste_track(HIGH, 2, &mut rng))
            .count();
        assert!((2_500..3_500).contains(&accepted), "accepted {}", accepted);
    }

    #[test]
    fn test_shuffle_and_take_keeps_subset() {
        let mut rng = StdRng::seed_from_u64(1);
        let taken = shuffle_and_take(tracks(20), 5, &mut rng);
        assert_eq!(taken.len(), 5);
        let ids: HashSet<_> = taken.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_shuffle_and_take_short_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(shuffle_and_take(tracks(3), 10, &mut rng).len(), 3);
        assert!(shuffle_and_take(tracks(3), 0, &mut rng).is_empty());
    }

    #[test]
    fn test_shuffle_is_seed_reproducible() {
        let a = shuffle_and_take(tracks(30), 30, &mut StdRng::seed_from_u64(9));
        let b = shuffle_and_take(tracks(30), 30, &mut StdRng::seed_from_u64(9));
        let ids_a: Vec<_> = a.iter().map(|t| t.id.as_str()).collect();
        let ids_b: Vec<_> = b.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_finalize_caps_at_total() {
        let mut pool = TrackPool::new();
        for track in tracks(30) {
            pool.insert(track);
        }
        let mut rng = StdRng::seed_from_u64(3);
        let final_tracks = finalize(pool, 25, &mut rng);
        assert_eq!(final_tracks.len(), 25);
    }
}
