//! Core module
//!
//! Configuration, errors, events and the fixed timestep

mod config;
mod error;
mod events;
mod time;

pub use config::{
    AiTuning, EnemySpawn, GameConfig, LevelConfig, PickableSpawn, PlayerTuning, SessionTuning,
};
pub use error::{ConfigError, GameError};
pub use events::{EventQueue, GameEvent};
pub use time::FixedTimestep;
