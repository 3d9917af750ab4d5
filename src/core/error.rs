//! Error types
//!
//! Only setup can fail. Per-tick code degrades locally and never returns
//! these errors.

use thiserror::Error;

/// Invalid or unreadable game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no respawn points configured; the player could never respawn")]
    EmptyRespawnConfiguration,

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Failures while building a game session.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("entity {0:?} does not exist")]
    NoSuchEntity(hecs::Entity),

    #[error("the session has no player")]
    NoPlayer,
}
