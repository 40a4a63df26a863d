//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Tunables for a [`PhysicsWorld`](crate::physics::PhysicsWorld).
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration added to every non-kinematic body, in units/s²
    pub gravity: Vec2,

    /// Maximum downward speed; `None` leaves falling speed unbounded
    pub terminal_velocity: Option<f32>,

    /// Gap left between a body and the surface it was clipped against
    pub contact_epsilon: f32,

    /// Slots reserved up front for dynamic bodies
    pub initial_body_capacity: usize,

    /// Slots reserved up front for static bodies
    pub initial_static_capacity: usize,
}

impl PhysicsConfig {
    /// Gravity and fall-speed cap tuned for a pixel-scale platformer
    pub fn platformer() -> Self {
        Self {
            gravity: Vec2::new(0.0, -2000.0),
            terminal_velocity: Some(10_000.0),
            ..Self::default()
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::zeros(),
            terminal_velocity: None,
            contact_epsilon: 0.001,
            initial_body_capacity: 0,
            initial_static_capacity: 0,
        }
    }
}

impl Config for PhysicsConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("platform_physics_{}_{name}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_load_partial_toml_uses_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "gravity = [0.0, -9.8]\ncontact_epsilon = 0.01\n").unwrap();

        let config = PhysicsConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.gravity, Vec2::new(0.0, -9.8));
        assert_eq!(config.contact_epsilon, 0.01);
        assert_eq!(config.terminal_velocity, None);
        assert_eq!(config.initial_body_capacity, 0);
    }

    #[test]
    fn test_load_ron() {
        let path = temp_path("level.ron");
        std::fs::write(
            &path,
            "(gravity: (0.0, -2000.0), terminal_velocity: Some(500.0), initial_body_capacity: 64)",
        )
        .unwrap();

        let config = PhysicsConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.gravity, Vec2::new(0.0, -2000.0));
        assert_eq!(config.terminal_velocity, Some(500.0));
        assert_eq!(config.initial_body_capacity, 64);
    }

    #[test]
    fn test_save_then_load_toml() {
        let path = temp_path("saved.toml");
        let original = PhysicsConfig::platformer();

        original.save_to_file(&path).unwrap();
        let loaded = PhysicsConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_unsupported_format() {
        let result = PhysicsConfig::default().save_to_file("physics.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PhysicsConfig::load_from_file(&temp_path("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
