//! Game configuration and level data
//!
//! Supports loading and saving in RON (Rusty Object Notation) or JSON.
//! Every section has defaults, so a file only needs the fields it changes.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::ai::OCCUPANCY_RADIUS;
use crate::ecs::PickableKind;

/// Enemy AI tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// How long a patrolling enemy idles at a waypoint
    pub wait_duration: f32,
    /// Radius within which another enemy makes a waypoint occupied
    pub occupancy_radius: f32,
    /// How far ahead a retreating enemy plans its escape
    pub flee_distance: f32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Arrival tolerance in units
    pub stopping_distance: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            wait_duration: 2.0,
            occupancy_radius: OCCUPANCY_RADIUS,
            flee_distance: 6.0,
            speed: 3.5,
            stopping_distance: 0.2,
        }
    }
}

/// Player tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Lives at level start
    pub health: u32,
    /// Respawn points closer than this to an enemy are unsafe
    pub hazard_radius: f32,
    /// Power-up countdown length in seconds
    pub power_up_duration: f32,
    /// Movement speed in units per second
    pub speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            health: 3,
            hazard_radius: 5.0,
            power_up_duration: 8.0,
            speed: 5.0,
        }
    }
}

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Enemy/player distance that counts as contact
    pub contact_radius: f32,
    /// Player/item distance that collects the item
    pub pickup_radius: f32,
    /// Seed for waypoint and respawn randomness
    pub seed: u64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            contact_radius: 0.8,
            pickup_radius: 0.6,
            seed: 0x5eed,
        }
    }
}

/// One enemy placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub position: Vec3,
    /// Player distance below which a patrolling enemy starts chasing
    pub chase_distance: f32,
    /// Enemies without a tracked player never chase or retreat
    #[serde(default = "default_tracks_player")]
    pub tracks_player: bool,
}

fn default_tracks_player() -> bool {
    true
}

/// One collectable placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickableSpawn {
    pub kind: PickableKind,
    pub position: Vec3,
}

/// Static level layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    pub player_start: Vec3,
    pub waypoints: Vec<Vec3>,
    pub respawn_points: Vec<Vec3>,
    pub enemies: Vec<EnemySpawn>,
    pub pickables: Vec<PickableSpawn>,
}

impl Default for LevelConfig {
    /// A square arena with patrol points at the corners.
    fn default() -> Self {
        Self {
            name: String::from("Arena"),
            player_start: Vec3::ZERO,
            waypoints: vec![
                Vec3::new(-10.0, 0.0, -10.0),
                Vec3::new(10.0, 0.0, -10.0),
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(-10.0, 0.0, 10.0),
                Vec3::new(0.0, 0.0, 12.0),
            ],
            respawn_points: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(-14.0, 0.0, 0.0),
                Vec3::new(14.0, 0.0, 0.0),
            ],
            enemies: vec![
                EnemySpawn {
                    position: Vec3::new(-10.0, 0.0, -10.0),
                    chase_distance: 6.0,
                    tracks_player: true,
                },
                EnemySpawn {
                    position: Vec3::new(10.0, 0.0, 10.0),
                    chase_distance: 6.0,
                    tracks_player: true,
                },
            ],
            pickables: vec![
                PickableSpawn {
                    kind: PickableKind::Coin,
                    position: Vec3::new(0.0, 0.0, -6.0),
                },
                PickableSpawn {
                    kind: PickableKind::PowerUp,
                    position: Vec3::new(6.0, 0.0, 0.0),
                },
                PickableSpawn {
                    kind: PickableKind::Coin,
                    position: Vec3::new(0.0, 0.0, 6.0),
                },
                PickableSpawn {
                    kind: PickableKind::Coin,
                    position: Vec3::new(-6.0, 0.0, 0.0),
                },
            ],
        }
    }
}

/// Complete configuration for a game session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ai: AiTuning,
    pub player: PlayerTuning,
    pub session: SessionTuning,
    pub level: LevelConfig,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: "must be a positive number",
        })
    }
}

impl GameConfig {
    /// Reject configurations the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty respawn list or a non-positive
    /// duration, radius, speed or tick rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level.respawn_points.is_empty() {
            return Err(ConfigError::EmptyRespawnConfiguration);
        }
        if self.player.health == 0 {
            return Err(ConfigError::InvalidValue {
                field: "player.health",
                reason: "must be at least 1",
            });
        }
        if self.session.tick_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.tick_rate",
                reason: "must be at least 1",
            });
        }

        positive("ai.wait_duration", self.ai.wait_duration)?;
        positive("ai.occupancy_radius", self.ai.occupancy_radius)?;
        positive("ai.flee_distance", self.ai.flee_distance)?;
        positive("ai.speed", self.ai.speed)?;
        positive("player.hazard_radius", self.player.hazard_radius)?;
        positive("player.power_up_duration", self.player.power_up_duration)?;
        positive("player.speed", self.player.speed)?;
        positive("session.contact_radius", self.session.contact_radius)?;
        positive("session.pickup_radius", self.session.pickup_radius)?;

        if self.ai.stopping_distance < 0.0 || self.ai.stopping_distance.is_nan() {
            return Err(ConfigError::InvalidValue {
                field: "ai.stopping_distance",
                reason: "must not be negative",
            });
        }
        if self
            .level
            .enemies
            .iter()
            .any(|e| e.chase_distance < 0.0 || e.chase_distance.is_nan())
        {
            return Err(ConfigError::InvalidValue {
                field: "level.enemies.chase_distance",
                reason: "must not be negative",
            });
        }

        Ok(())
    }

    /// Parse a configuration from RON text.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Render the configuration as pretty RON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save the configuration to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Load a configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Save the configuration to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load by file extension: `.json` as JSON, anything else as RON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::load_json(path),
            _ => Self::load_ron(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_wait_and_occupancy() {
        let ai = AiTuning::default();
        assert!((ai.wait_duration - 2.0).abs() < f32::EPSILON);
        assert!((ai.occupancy_radius - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_respawn_list_rejected() {
        let mut config = GameConfig::default();
        config.level.respawn_points.clear();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRespawnConfiguration)
        ));
    }

    #[test]
    fn test_negative_or_nan_distances_rejected() {
        let mut config = GameConfig::default();
        config.ai.stopping_distance = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "ai.stopping_distance",
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.level.enemies[0].chase_distance = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "level.enemies.chase_distance",
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.ai.stopping_distance = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_values_rejected() {
        let mut config = GameConfig::default();
        config.player.power_up_duration = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "player.power_up_duration",
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.ai.speed = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_ron() {
        let mut config = GameConfig::default();
        config.level.name = String::from("Crypt");
        config.session.seed = 42;

        let ron_str = config.to_ron_string().unwrap();
        assert!(ron_str.contains("Crypt"));

        let loaded = GameConfig::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let loaded = GameConfig::from_ron_str("(player: (health: 5))").unwrap();

        assert_eq!(loaded.player.health, 5);
        assert_eq!(loaded.ai, AiTuning::default());
        assert_eq!(loaded.level, LevelConfig::default());
    }

    #[test]
    fn test_config_serialization_json() {
        let config = GameConfig::default();

        let json_str = serde_json::to_string(&config).unwrap();
        let loaded: GameConfig = serde_json::from_str(&json_str).unwrap();

        assert_eq!(loaded.level.enemies.len(), config.level.enemies.len());
        assert_eq!(loaded.level.waypoints, config.level.waypoints);
    }
}
