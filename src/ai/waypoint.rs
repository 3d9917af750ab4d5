//! Patrol waypoint selection
//!
//! Waypoints are drawn at random so that several agents do not all converge
//! on the same first free point. Draws are independent (with replacement):
//! a small set may retry the same occupied waypoint before the attempt
//! budget runs out, in which case the caller idles and retries later.

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;

/// A patrol destination from level data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub id: u32,
    pub position: Vec3,
}

impl Waypoint {
    #[must_use]
    pub fn new(id: u32, position: Vec3) -> Self {
        Self { id, position }
    }

    /// Number the positions in order.
    #[must_use]
    pub fn from_positions(positions: &[Vec3]) -> Vec<Self> {
        positions
            .iter()
            .zip(0u32..)
            .map(|(&position, id)| Self::new(id, position))
            .collect()
    }
}

/// Pick an unoccupied waypoint with at most `candidates.len()` random draws.
///
/// Returns `None` when every draw hit an occupied waypoint (always the case
/// when all of them are occupied, or when there are no candidates).
pub fn select_waypoint<'w, R, F>(
    candidates: &'w [Waypoint],
    mut is_occupied: F,
    rng: &mut R,
) -> Option<&'w Waypoint>
where
    R: Rng + ?Sized,
    F: FnMut(&Waypoint) -> bool,
{
    for _ in 0..candidates.len() {
        let candidate = candidates.choose(rng)?;
        if !is_occupied(candidate) {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn line(n: usize) -> Vec<Waypoint> {
        let positions: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32 * 5.0, 0.0, 0.0)).collect();
        Waypoint::from_positions(&positions)
    }

    #[test]
    fn test_empty_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(select_waypoint(&[], |_| false, &mut rng).is_none());
    }

    #[test]
    fn test_all_occupied_returns_none() {
        let waypoints = line(4);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(select_waypoint(&waypoints, |_| true, &mut rng).is_none());
    }

    #[test]
    fn test_attempt_budget_equals_candidate_count() {
        let waypoints = line(5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut draws = 0;

        let picked = select_waypoint(
            &waypoints,
            |_| {
                draws += 1;
                true
            },
            &mut rng,
        );

        assert!(picked.is_none());
        assert_eq!(draws, 5);
    }

    #[test]
    fn test_single_free_waypoint_is_found_eventually() {
        let waypoints = line(3);
        let free = waypoints[2].id;

        let found = (0..64).any(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            select_waypoint(&waypoints, |w| w.id != free, &mut rng).is_some()
        });

        assert!(found);
    }

    #[test]
    fn test_free_waypoints_are_drawn_at_random() {
        let waypoints = line(4);
        let mut seen = [false; 4];

        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let picked = select_waypoint(&waypoints, |w| w.id == 0, &mut rng);
            if let Some(w) = picked {
                seen[w.id as usize] = true;
            }
        }

        assert_eq!(seen, [false, true, true, true]);
    }

    #[test]
    fn test_draws_with_replacement_can_miss_a_free_waypoint() {
        let waypoints = line(2);
        let mut found = 0;
        let mut missed = 0;

        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match select_waypoint(&waypoints, |w| w.id == 0, &mut rng) {
                Some(w) => {
                    assert_eq!(w.id, 1);
                    found += 1;
                }
                None => missed += 1,
            }
        }

        assert!(found > 0);
        assert!(missed > 0, "both draws landing on the occupied point returns None");
    }

    proptest! {
        #[test]
        fn prop_never_returns_occupied(
            occupied in proptest::collection::vec(any::<bool>(), 1..12),
            seed in any::<u64>(),
        ) {
            let waypoints = line(occupied.len());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let picked = select_waypoint(&waypoints, |w| occupied[w.id as usize], &mut rng);

            match picked {
                Some(w) => {
                    prop_assert!(!occupied[w.id as usize]);
                }
                None => {
                    prop_assert!(occupied.iter().any(|o| *o));
                }
            }
            if occupied.iter().all(|o| *o) {
                prop_assert!(picked.is_none());
            }
            if occupied.iter().all(|o| !*o) {
                prop_assert!(picked.is_some());
            }
        }
    }
}
