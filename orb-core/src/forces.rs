//! External forces applied at the start of every tick.
//!
//! The default field pulls every dynamic body toward a single attractor
//! point (a planet the bodies rest on) rather than along a fixed "down":
//!
//! ```text
//!        ●  ↘
//!   ● →   ╭──────╮   ← ●
//!         │  ✦   │        ✦ = attractor center
//!   ● ↗   ╰──────╯   ↖ ●
//! ```
//!
//! A uniform field is available for flat-world scenes.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::config::ConfigError;
use crate::types::{constants, normalize_or_zero, Vec3};

/// Gravity acting on dynamic bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GravityField {
    /// Constant-magnitude pull toward `center`.
    Central { strength: f64, center: Vec3 },
    /// Same acceleration everywhere.
    Uniform { acceleration: Vec3 },
    None,
}

impl Default for GravityField {
    fn default() -> Self {
        GravityField::Central {
            strength: constants::GRAVITY,
            center: Vec3::new(0.0, 0.0, -1000.0),
        }
    }
}

impl GravityField {
    /// Acceleration felt by a mass center at `point`.
    ///
    /// A point exactly on a central attractor feels nothing.
    pub fn acceleration_at(&self, point: &Vec3) -> Vec3 {
        match self {
            GravityField::Central { strength, center } => {
                normalize_or_zero(&(center - point)) * *strength
            }
            GravityField::Uniform { acceleration } => *acceleration,
            GravityField::None => Vec3::zeros(),
        }
    }

    /// Same field with its attractor moved to `center`. Non-central fields are
    /// returned unchanged.
    pub fn centered_on(&self, center: Vec3) -> Self {
        match self {
            GravityField::Central { strength, .. } => GravityField::Central {
                strength: *strength,
                center,
            },
            other => *other,
        }
    }

    /// Apply one tick of gravity to every dynamic body as a linear impulse
    /// `a · m · dt`.
    pub fn apply(&self, bodies: &mut [Body], dt: f64) {
        if matches!(self, GravityField::None) {
            return;
        }
        for body in bodies.iter_mut().filter(|b| !b.is_static()) {
            let acceleration = self.acceleration_at(&body.world_mass_center());
            body.apply_linear_impulse(&(acceleration * body.mass() * dt));
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let finite = |v: &Vec3| v.iter().all(|c| c.is_finite());
        let ok = match self {
            GravityField::Central { strength, center } => strength.is_finite() && finite(center),
            GravityField::Uniform { acceleration } => finite(acceleration),
            GravityField::None => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::Invalid(
                "gravity parameters must be finite".to_string(),
            ))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
