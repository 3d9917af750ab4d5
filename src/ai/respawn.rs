//! Player respawn point selection
//!
//! A point is safe when every enemy is farther than the hazard radius. Safe
//! points are chosen uniformly at random; when there are none the point with
//! the most clearance wins, ties going to the earliest point.

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::core::ConfigError;

/// A respawn location from level data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnPoint {
    pub id: u32,
    pub position: Vec3,
}

/// Ordered, non-empty set of respawn points.
///
/// Emptiness is rejected here, at setup, so selection can never come back
/// empty-handed during play.
#[derive(Debug, Clone)]
pub struct RespawnPoints {
    first: RespawnPoint,
    rest: Vec<RespawnPoint>,
}

impl RespawnPoints {
    pub fn new(points: Vec<RespawnPoint>) -> Result<Self, ConfigError> {
        let mut points = points.into_iter();
        let first = points.next().ok_or(ConfigError::EmptyRespawnConfiguration)?;
        Ok(Self {
            first,
            rest: points.collect(),
        })
    }

    /// Number the positions in order.
    pub fn from_positions(positions: &[Vec3]) -> Result<Self, ConfigError> {
        let points = positions
            .iter()
            .zip(0u32..)
            .map(|(&position, id)| RespawnPoint { id, position })
            .collect();
        Self::new(points)
    }

    #[must_use]
    pub fn first(&self) -> &RespawnPoint {
        &self.first
    }

    pub fn iter(&self) -> impl Iterator<Item = &RespawnPoint> {
        std::iter::once(&self.first).chain(&self.rest)
    }
}

/// Outcome of a respawn selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnChoice<'r> {
    pub point: &'r RespawnPoint,
    /// Distance to the nearest enemy (infinite when there are none)
    pub clearance: f32,
    /// Whether the clearance exceeds the hazard radius
    pub safe: bool,
}

fn clearance(position: Vec3, enemies: &[Vec3]) -> f32 {
    enemies
        .iter()
        .map(|enemy| enemy.distance(position))
        .fold(f32::INFINITY, f32::min)
}

/// Choose where the player comes back.
pub fn select_respawn<'r, R>(
    candidates: &'r RespawnPoints,
    enemies: &[Vec3],
    hazard_radius: f32,
    rng: &mut R,
) -> RespawnChoice<'r>
where
    R: Rng + ?Sized,
{
    let evaluate = |point: &'r RespawnPoint| {
        let clearance = clearance(point.position, enemies);
        RespawnChoice {
            point,
            clearance,
            safe: clearance > hazard_radius,
        }
    };

    let mut safe: SmallVec<[RespawnChoice<'r>; 8]> = SmallVec::new();
    // Only consulted when nothing is safe, and then the first point is unsafe too.
    let mut least_bad = evaluate(candidates.first());

    for choice in candidates.iter().map(evaluate) {
        if choice.safe {
            safe.push(choice);
        } else if choice.clearance > least_bad.clearance {
            least_bad = choice;
        }
    }

    safe.choose(rng).copied().unwrap_or(least_bad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn points(xs: &[f32]) -> RespawnPoints {
        let positions: Vec<Vec3> = xs.iter().map(|&x| Vec3::new(x, 0.0, 0.0)).collect();
        RespawnPoints::from_positions(&positions).unwrap()
    }

    #[test]
    fn test_empty_configuration_rejected() {
        assert!(matches!(
            RespawnPoints::new(Vec::new()),
            Err(ConfigError::EmptyRespawnConfiguration)
        ));
    }

    #[test]
    fn test_single_safe_point_is_deterministic() {
        // Two points within the hazard radius, one at distance 10.
        let candidates = points(&[0.0, 20.0, 40.0]);
        let enemies = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(21.0, 0.0, 0.0)];

        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let choice = select_respawn(&candidates, &enemies, 3.0, &mut rng);
            assert_eq!(choice.point.id, 2);
            assert!(choice.safe);
            assert!((choice.clearance - 19.0).abs() < 1e-4);
        }

        let enemies = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(21.0, 0.0, 0.0),
            Vec3::new(50.0, 0.0, 0.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let choice = select_respawn(&candidates, &enemies, 3.0, &mut rng);
        assert_eq!(choice.point.id, 2);
        assert!((choice.clearance - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_safe_point_is_drawn_at_random() {
        let candidates = points(&[0.0, 20.0, 40.0, 60.0]);
        let enemies = [Vec3::new(61.0, 0.0, 0.0)];
        let mut seen = [false; 4];

        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let choice = select_respawn(&candidates, &enemies, 3.0, &mut rng);
            assert!(choice.safe);
            seen[choice.point.id as usize] = true;
        }

        assert_eq!(seen, [true, true, true, false]);
    }

    #[test]
    fn test_no_enemies_means_everything_is_safe() {
        let candidates = points(&[0.0, 1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let choice = select_respawn(&candidates, &[], 3.0, &mut rng);

        assert!(choice.safe);
        assert!(choice.clearance.is_infinite());
    }

    #[test]
    fn test_all_unsafe_picks_largest_clearance() {
        let candidates = points(&[0.0, 10.0, 20.0]);
        let enemies = [
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(12.0, 0.0, 0.0),
            Vec3::new(21.0, 0.0, 0.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let choice = select_respawn(&candidates, &enemies, 5.0, &mut rng);

        assert_eq!(choice.point.id, 1);
        assert!(!choice.safe);
        assert!((choice.clearance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_all_unsafe_tie_goes_to_first() {
        let candidates = points(&[0.0, 10.0]);
        let enemies = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(11.0, 0.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let choice = select_respawn(&candidates, &enemies, 5.0, &mut rng);

        assert_eq!(choice.point.id, 0);
    }

    #[test]
    fn test_hazard_radius_boundary_is_unsafe() {
        let candidates = points(&[0.0]);
        let enemies = [Vec3::new(3.0, 0.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let choice = select_respawn(&candidates, &enemies, 3.0, &mut rng);

        assert!(!choice.safe);
    }

    proptest! {
        #[test]
        fn prop_respawn_policy(
            xs in proptest::collection::vec(-50.0f32..50.0, 1..8),
            enemy_xs in proptest::collection::vec(-50.0f32..50.0, 0..6),
            hazard in 0.5f32..20.0,
            seed in any::<u64>(),
        ) {
            let candidates = points(&xs);
            let enemies: Vec<Vec3> = enemy_xs.iter().map(|&x| Vec3::new(x, 0.0, 0.0)).collect();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let choice = select_respawn(&candidates, &enemies, hazard, &mut rng);
            let clearances: Vec<f32> = candidates
                .iter()
                .map(|p| clearance(p.position, &enemies))
                .collect();

            if clearances.iter().any(|c| *c > hazard) {
                prop_assert!(choice.safe);
                prop_assert!(clearances[choice.point.id as usize] > hazard);
            } else {
                let best = clearances.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let first_best = clearances.iter().position(|c| *c == best).unwrap();
                prop_assert_eq!(choice.point.id as usize, first_best);
            }
        }
    }
}
