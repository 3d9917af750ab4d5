//! AI and navigation module
//!
//! Provides the state machine, steering, navigation, spatial queries and the
//! waypoint/respawn selection policies.

mod fsm;
mod navigation;
mod respawn;
mod spatial;
mod steering;
mod waypoint;

pub use fsm::{State, StateChange, StateMachine, StateName, Transition};
pub use navigation::{NavAgent, Navigator};
pub use respawn::{RespawnChoice, RespawnPoint, RespawnPoints, select_respawn};
pub use spatial::{ActorRecord, ActorSnapshot, OCCUPANCY_RADIUS};
pub use steering::{Flee, Seek, SteeringBehavior, SteeringOutput};
pub use waypoint::{Waypoint, select_waypoint};
