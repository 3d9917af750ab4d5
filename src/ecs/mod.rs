//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod world;

pub use components::{ActorKind, Name, Pickable, PickableKind, Transform};
pub use world::World;
