//! Steering behaviors for AI movement
//!
//! Seek drives the kinematic navigator towards its destination; Flee gives
//! retreating enemies a direction away from the player.

use glam::Vec3;

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Linear velocity request
    pub linear: Vec3,
}

impl SteeringOutput {
    /// Zero steering
    pub const ZERO: Self = Self { linear: Vec3::ZERO };
}

/// Trait for steering behaviors
pub trait SteeringBehavior {
    /// Calculate steering for an agent at `position`
    fn calculate(&self, position: Vec3) -> SteeringOutput;
}

/// Seek behavior - move towards target
#[derive(Debug, Clone)]
pub struct Seek {
    /// Target position
    pub target: Vec3,
    /// Maximum speed
    pub max_speed: f32,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub fn new(target: Vec3, max_speed: f32) -> Self {
        Self { target, max_speed }
    }
}

impl SteeringBehavior for Seek {
    fn calculate(&self, position: Vec3) -> SteeringOutput {
        let direction = (self.target - position).normalize_or_zero();
        SteeringOutput {
            linear: direction * self.max_speed,
        }
    }
}

/// Flee behavior - move away from target
#[derive(Debug, Clone)]
pub struct Flee {
    /// Target position to flee from
    pub threat: Vec3,
    /// Maximum speed
    pub max_speed: f32,
}

impl Flee {
    /// Create a new flee behavior
    #[must_use]
    pub fn new(threat: Vec3, max_speed: f32) -> Self {
        Self { threat, max_speed }
    }

    /// Point `distance` units away from the threat, seen from `position`.
    ///
    /// Returns `None` when standing on the threat (no defined direction).
    #[must_use]
    pub fn escape_point(&self, position: Vec3, distance: f32) -> Option<Vec3> {
        let direction = self.calculate(position).linear.normalize_or_zero();
        (direction != Vec3::ZERO).then(|| position + direction * distance)
    }
}

impl SteeringBehavior for Flee {
    fn calculate(&self, position: Vec3) -> SteeringOutput {
        let direction = (position - self.threat).normalize_or_zero();
        SteeringOutput {
            linear: direction * self.max_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek() {
        let seek = Seek::new(Vec3::new(10.0, 0.0, 0.0), 5.0);
        let output = seek.calculate(Vec3::ZERO);

        assert!(output.linear.x > 0.0);
        assert!((output.linear.length() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_seek_at_target_is_zero() {
        let seek = Seek::new(Vec3::ONE, 5.0);
        assert_eq!(seek.calculate(Vec3::ONE), SteeringOutput::ZERO);
    }

    #[test]
    fn test_flee() {
        let flee = Flee::new(Vec3::new(10.0, 0.0, 0.0), 5.0);
        let output = flee.calculate(Vec3::ZERO);

        assert!(output.linear.x < 0.0); // Flee in opposite direction
    }

    #[test]
    fn test_flee_escape_point() {
        let flee = Flee::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let point = flee.escape_point(Vec3::ZERO, 4.0).unwrap();

        assert!((point - Vec3::new(-4.0, 0.0, 0.0)).length() < 0.001);
        assert!(flee.escape_point(Vec3::new(2.0, 0.0, 0.0), 4.0).is_none());
    }
}
