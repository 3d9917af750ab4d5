//! Pursuit game core
//!
//! This crate provides:
//! - Enemy AI with a Patrol / Chase / Retreat state machine
//! - Waypoint and respawn point selection over actor snapshots
//! - A power-up countdown that interrupts subscribed enemies
//! - A headless game session driven by a fixed timestep

pub mod ai;
pub mod core;
pub mod ecs;
pub mod game;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{ActorSnapshot, NavAgent, Navigator, StateChange, Waypoint};
    pub use crate::core::{ConfigError, FixedTimestep, GameConfig, GameError, GameEvent};
    pub use crate::ecs::{ActorKind, Name, PickableKind, Transform, World};
    pub use crate::game::{ContactOutcome, EnemyState, GameOutcome, GameSession};
    pub use glam::Vec3;
}
