//! Material presets.
//!
//! A material carries the two surface coefficients a body contributes to a
//! contact. Presets live as YAML files so scenes can be tuned without
//! recompiling:
//!
//! ```text
//! materials/
//! ├── default.yaml
//! ├── rubber.yaml
//! └── stone.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Surface coefficients of a body.
///
/// Both are combined multiplicatively with the other body's at contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// 0 = perfectly inelastic, 1 = perfectly elastic
    pub restitution: f64,
    pub friction: f64,
}

impl Material {
    pub fn new(name: &str, restitution: f64, friction: f64) -> Self {
        Self {
            name: name.to_string(),
            restitution,
            friction,
        }
    }

    /// Bouncy and grippy.
    pub fn rubber() -> Self {
        Self::new("rubber", 0.8, 0.9)
    }

    /// Dull, heavy bounce.
    pub fn stone() -> Self {
        Self::new("stone", 0.3, 0.6)
    }

    /// Reject coefficients outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.restitution) || !in_unit(self.friction) {
            return Err(ConfigError::Invalid(format!(
                "material '{}' coefficients must lie in [0, 1] (restitution={}, friction={})",
                self.name, self.restitution, self.friction
            )));
        }
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", 1.0, 0.5)
    }
}

/// Material loader with configurable base directory.
pub struct MaterialLoader {
    base_path: PathBuf,
}

impl MaterialLoader {
    /// Create a new loader reading `<base_path>/<name>.yaml`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a material by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = MaterialLoader::new("materials");
    /// let rubber = loader.load("rubber")?;
    /// ```
    pub fn load(&self, name: &str) -> Result<Material, ConfigError> {
        let path = self.base_path.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let material: Material = serde_yaml::from_str(&contents)?;
        material.validate()?;
        log::debug!("loaded material '{}' from {}", material.name, path.display());
        Ok(material)
    }

    /// List all available materials, sorted by name.
    pub fn list(&self) -> Result<Vec<String>, ConfigError> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
