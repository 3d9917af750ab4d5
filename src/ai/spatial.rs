//! Spatial queries over a per-tick actor snapshot
//!
//! Actors are treated as points. Every query is a pure function of the
//! snapshot, so all agents in one tick see the same world.

use glam::Vec3;
use hecs::Entity;
use smallvec::SmallVec;

use crate::ecs::ActorKind;

/// Default radius used to decide whether a waypoint is taken by another agent.
pub const OCCUPANCY_RADIUS: f32 = 0.7;

/// Copy of one actor at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorRecord {
    pub entity: Entity,
    pub kind: ActorKind,
    pub position: Vec3,
}

/// Read-only set of actors taken at the start of a tick.
#[derive(Debug, Clone, Default)]
pub struct ActorSnapshot {
    actors: Vec<ActorRecord>,
}

impl ActorSnapshot {
    #[must_use]
    pub fn new(actors: Vec<ActorRecord>) -> Self {
        Self { actors }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorRecord> {
        self.actors.iter()
    }

    /// All actors tagged as enemies.
    pub fn enemies(&self) -> impl Iterator<Item = &ActorRecord> {
        self.actors.iter().filter(|a| a.kind == ActorKind::Enemy)
    }

    /// Position of `entity` at snapshot time.
    #[must_use]
    pub fn position(&self, entity: Entity) -> Option<Vec3> {
        self.actors
            .iter()
            .find(|a| a.entity == entity)
            .map(|a| a.position)
    }

    /// Actors whose position lies within `radius` of `center` (inclusive).
    #[must_use]
    pub fn overlap_sphere(&self, center: Vec3, radius: f32) -> SmallVec<[ActorRecord; 8]> {
        self.actors
            .iter()
            .filter(|a| a.position.distance(center) <= radius)
            .copied()
            .collect()
    }

    /// Whether an enemy other than `requester` stands within `radius` of `position`.
    #[must_use]
    pub fn is_occupied(&self, position: Vec3, radius: f32, requester: Option<Entity>) -> bool {
        self.overlap_sphere(position, radius)
            .iter()
            .any(|hit| hit.kind == ActorKind::Enemy && Some(hit.entity) != requester)
    }

    /// Closest enemy to `position` and its distance.
    #[must_use]
    pub fn nearest_hazard(&self, position: Vec3) -> Option<(Entity, f32)> {
        self.enemies()
            .map(|a| (a.entity, a.position.distance(position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Enemy positions, in snapshot order.
    #[must_use]
    pub fn enemy_positions(&self) -> Vec<Vec3> {
        self.enemies().map(|a| a.position).collect()
    }
}
