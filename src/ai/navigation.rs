//! Navigation primitive consumed by the AI
//!
//! The host engine normally owns pathfinding. The AI only needs the narrow
//! [`Navigator`] surface; [`NavAgent`] is a straight-line kinematic
//! implementation used by the headless session and in tests.

use glam::Vec3;

use super::steering::{Seek, SteeringBehavior};

/// Per-agent navigation surface.
pub trait Navigator {
    /// Request a path to `destination`.
    fn set_destination(&mut self, destination: Vec3);

    /// Current destination, if a path is active.
    fn destination(&self) -> Option<Vec3>;

    /// Whether the last requested path is still being computed.
    fn path_pending(&self) -> bool;

    /// Distance left along the active path (0 when there is none).
    fn remaining_distance(&self) -> f32;

    /// Arrival tolerance.
    fn stopping_distance(&self) -> f32;

    /// Drop the active path and stop.
    fn reset_path(&mut self);
}

/// Kinematic navigator moving in a straight line at constant speed.
///
/// A freshly requested path stays pending until the next [`NavAgent::step`],
/// mirroring engines that resolve paths asynchronously.
#[derive(Debug, Clone)]
pub struct NavAgent {
    /// Movement speed in units per second
    pub speed: f32,
    /// Arrival tolerance in units
    pub stopping_distance: f32,
    destination: Option<Vec3>,
    pending: bool,
    remaining: f32,
}

impl NavAgent {
    /// Create an idle navigator.
    #[must_use]
    pub fn new(speed: f32, stopping_distance: f32) -> Self {
        Self {
            speed,
            stopping_distance,
            destination: None,
            pending: false,
            remaining: 0.0,
        }
    }

    /// Resolve a pending path and advance `position` towards the destination.
    pub fn step(&mut self, position: &mut Vec3, dt: f32) {
        self.pending = false;

        let Some(destination) = self.destination else {
            self.remaining = 0.0;
            return;
        };

        let distance = position.distance(destination);
        if distance > self.stopping_distance {
            let velocity = Seek::new(destination, self.speed).calculate(*position).linear;
            let travel = (self.speed * dt).min(distance);
            *position += velocity.normalize_or_zero() * travel;
        }

        self.remaining = position.distance(destination);
    }
}

impl Navigator for NavAgent {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
        self.pending = true;
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn path_pending(&self) -> bool {
        self.pending
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.pending = false;
        self.remaining = 0.0;
    }
}
