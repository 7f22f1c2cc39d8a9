//! Core numeric types for the physics simulation.
//!
//! Units are whatever the caller spawns bodies in; the defaults assume:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Angular velocity: radians per second (rad/s)
//! - Mass: kilograms (kg)
//!
//! Vector, quaternion and matrix arithmetic comes from `nalgebra`. This module
//! only fixes the scalar type and adds the axis-aligned [`Bounds`] the
//! broadphase works with.

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

// =============================================================================
// Aliases
// =============================================================================

/// A 3D vector used for positions, velocities, impulses and axes.
pub type Vec3 = Vector3<f64>;

/// A unit quaternion describing body orientation.
pub type Quat = UnitQuaternion<f64>;

/// A 3x3 matrix, used for inertia tensors and rotations.
pub type Mat3 = Matrix3<f64>;

/// Returns `v` scaled to unit length, or zero if `v` is (nearly) zero.
///
/// Unlike `Vector3::normalize`, never yields NaN.
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    v.try_normalize(constants::EPSILON)
        .unwrap_or_else(Vec3::zeros)
}

/// Inverse of `m`, or the zero matrix if `m` is singular.
pub fn inverse_or_zero(m: &Mat3) -> Mat3 {
    m.try_inverse().unwrap_or_else(Mat3::zeros)
}

// =============================================================================
// Bounds
// =============================================================================

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl Bounds {
    pub fn new(mins: Vec3, maxs: Vec3) -> Self {
        Self { mins, maxs }
    }

    /// An inverted box that any call to [`Bounds::expand`] will replace.
    pub fn empty() -> Self {
        Self {
            mins: Vec3::repeat(f64::INFINITY),
            maxs: Vec3::repeat(f64::NEG_INFINITY),
        }
    }

    /// Box centered on `center` reaching `half_extent` along every axis.
    pub fn around(center: Vec3, half_extent: f64) -> Self {
        let offset = Vec3::repeat(half_extent);
        Self {
            mins: center - offset,
            maxs: center + offset,
        }
    }

    /// True until at least one point has been added to an [`Bounds::empty`] box.
    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x || self.mins.y > self.maxs.y || self.mins.z > self.maxs.z
    }

    /// Grow the box to contain `point`.
    pub fn expand(&mut self, point: Vec3) {
        self.mins = self.mins.inf(&point);
        self.maxs = self.maxs.sup(&point);
    }

    /// Grow the box to contain `other`.
    pub fn expand_bounds(&mut self, other: &Bounds) {
        self.expand(other.mins);
        self.expand(other.maxs);
    }

    /// Inclusive overlap test.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.mins.x <= other.maxs.x
            && self.maxs.x >= other.mins.x
            && self.mins.y <= other.maxs.y
            && self.maxs.y >= other.mins.y
            && self.mins.z <= other.maxs.z
            && self.maxs.z >= other.mins.z
    }

    pub fn width_x(&self) -> f64 {
        self.maxs.x - self.mins.x
    }

    pub fn width_y(&self) -> f64 {
        self.maxs.y - self.mins.y
    }

    pub fn width_z(&self) -> f64 {
        self.maxs.z - self.mins.z
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Constants
// =============================================================================

/// Constants shared across the engine.
pub mod constants {
    /// Ceiling on a body's angular speed (rad/s), applied after every angular impulse.
    pub const MAX_ANGULAR_SPEED: f64 = 30.0;

    /// Padding added to each end of a body's swept bounds in the broadphase.
    pub const BROADPHASE_MARGIN: f64 = 0.01;

    /// Relative displacements shorter than this use the static overlap test.
    pub const MIN_SWEEP_LENGTH: f64 = 0.001;

    /// Slack on the sum of radii in the static overlap test.
    pub const OVERLAP_SLOP: f64 = 0.001;

    /// Default strength of the central gravity field (m/s²).
    pub const GRAVITY: f64 = 25.0;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_zero() {
        let n = normalize_or_zero(&Vec3::new(3.0, 4.0, 0.0));
        assert!((n.norm() - 1.0).abs() < 1e-10);
        assert!((n.x - 0.6).abs() < 1e-10);

        let z = normalize_or_zero(&Vec3::zeros());
        assert_eq!(z, Vec3::zeros(), "zero vector must stay zero, not NaN");
    }

    #[test]
    fn test_inverse_or_zero_singular() {
        assert_eq!(inverse_or_zero(&Mat3::zeros()), Mat3::zeros());

        let m = Mat3::from_diagonal_element(4.0);
        let inv = inverse_or_zero(&m);
        assert!((inv[(0, 0)] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_expand() {
        let mut b = Bounds::empty();
        assert!(b.is_empty());

        b.expand(Vec3::new(1.0, -2.0, 3.0));
        b.expand(Vec3::new(-1.0, 2.0, 0.0));
        assert!(!b.is_empty());
        assert_eq!(b.mins, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.maxs, Vec3::new(1.0, 2.0, 3.0));
        assert!((b.width_y() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Bounds::around(Vec3::zeros(), 1.0);
        let b = Bounds::around(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let c = Bounds::around(Vec3::new(5.0, 0.0, 0.0), 1.0);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_bounds_touching_counts_as_overlap() {
        let a = Bounds::around(Vec3::zeros(), 1.0);
        let b = Bounds::around(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(a.overlaps(&b));
    }
}
