//! Game rules module
//!
//! Enemies, the player record, the power-up countdown, scoring and the
//! session that runs them each tick.

mod enemy;
mod pickable;
mod player;
mod powerup;
mod score;
mod session;

pub use enemy::{
    ContactOutcome, EnemyAgent, EnemyContext, EnemyState, PatrolPhase, PatrolState,
    resolve_contact,
};
pub use pickable::{Collected, PickableRegistry};
pub use player::{LifeOutcome, PlayerStatus};
pub use powerup::{CountdownHandle, PowerUpObserver, PowerUpSignal, PowerUpTimer};
pub use score::ScoreBoard;
pub use session::{GameOutcome, GameSession, LOSE_SCENE, WIN_SCENE};
