//! Common ECS components

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Transform component. Actors only need a world-space position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
}

impl Transform {
    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// Actor tag used by spatial queries and contact resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// AI-driven pursuer
    Enemy,
    /// The human-controlled actor
    Player,
}

/// Collectable item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickableKind {
    /// Plain score item
    Coin,
    /// Starts the player's power-up countdown
    PowerUp,
}

/// Marks an entity as a collectable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickable {
    pub kind: PickableKind,
}

/// Name component for debugging
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
