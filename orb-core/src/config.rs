//! World configuration.
//!
//! A [`WorldConfig`] is handed to [`World::new`](crate::world::World::new); it
//! can be built in code or loaded from YAML:
//!
//! ```yaml
//! gravity:
//!   kind: central
//!   strength: 25.0
//!   center: [0.0, 0.0, -1000.0]
//! pair_finder: sort_and_sweep
//! broadphase_margin: 0.01
//! sweep_axis: [1.0, 1.0, 1.0]
//! ```
//!
//! Missing keys fall back to [`WorldConfig::default`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::forces::GravityField;
use crate::types::{constants, Vec3};

/// Error type for configuration and material loading.
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(serde_yaml::Error),
    NotFound(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "YAML parse error: {}", e),
            ConfigError::NotFound(name) => write!(f, "Not found: {}", name),
            ConfigError::Invalid(reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err)
    }
}

/// How candidate pairs are produced before narrow-phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairFinder {
    /// 1-D sort-and-sweep over projected swept bounds.
    #[default]
    SortAndSweep,
    /// Every unordered pair; O(n²) but exact in what it hands narrow-phase.
    BruteForce,
}

/// Parameters of a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: GravityField,
    pub pair_finder: PairFinder,
    /// Padding on each end of a body's swept bounds.
    pub broadphase_margin: f64,
    /// Axis the broadphase projects bounds onto; normalized on use.
    pub sweep_axis: Vec3,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: GravityField::default(),
            pair_finder: PairFinder::SortAndSweep,
            broadphase_margin: constants::BROADPHASE_MARGIN,
            sweep_axis: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl WorldConfig {
    /// Configuration without gravity, useful for isolated collision scenes.
    pub fn weightless() -> Self {
        Self {
            gravity: GravityField::None,
            ..Self::default()
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        log::debug!("loaded world config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot step with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.broadphase_margin.is_finite() || self.broadphase_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "broadphase_margin must be finite and non-negative, got {}",
                self.broadphase_margin
            )));
        }
        if !self.sweep_axis.iter().all(|c| c.is_finite())
            || self.sweep_axis.norm_squared() < constants::EPSILON
        {
            return Err(ConfigError::Invalid(
                "sweep_axis must be a finite, non-zero vector".to_string(),
            ));
        }
        self.gravity.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pair_finder, PairFinder::SortAndSweep);
        assert!((config.broadphase_margin - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_parse_partial_yaml_uses_defaults() {
        let config = WorldConfig::from_yaml_str("pair_finder: brute_force\n").unwrap();
        assert_eq!(config.pair_finder, PairFinder::BruteForce);
        assert_eq!(config.gravity, GravityField::default());
        assert_eq!(config.sweep_axis, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_parse_uniform_gravity() {
        let yaml = "gravity:\n  kind: uniform\n  acceleration: [0.0, 0.0, -9.81]\n";
        let config = WorldConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(
            config.gravity,
            GravityField::Uniform {
                acceleration: Vec3::new(0.0, 0.0, -9.81)
            }
        );
    }

    #[test]
    fn test_negative_margin_rejected() {
        let result = WorldConfig::from_yaml_str("broadphase_margin: -1.0\n");
        match result {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("broadphase_margin")),
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_sweep_axis_rejected() {
        let result = WorldConfig::from_yaml_str("sweep_axis: [0.0, 0.0, 0.0]\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = WorldConfig::from_yaml_str("gravity: [not, a, field");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = WorldConfig::load("definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_yaml_roundtrip_of_default() {
        let yaml = serde_yaml::to_string(&WorldConfig::default()).unwrap();
        let parsed = WorldConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, WorldConfig::default());
    }
}
