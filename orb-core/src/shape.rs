//! Collision shapes.
//!
//! A [`Shape`] supplies the geometric and inertial data a [`Body`](crate::body::Body)
//! needs: its local mass center, its mass-normalized inertia tensor and its
//! axis-aligned bounds. Only spheres exist today; new kinds are added as enum
//! variants so every consumer gets a compile-time checked `match`.

use crate::types::{Bounds, Mat3, Quat, Vec3};

/// A solid sphere centered on its body's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub radius: f64,
}

impl Sphere {
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Inertia tensor of a solid sphere divided by its mass: `(2/5)·r²·I`.
    pub fn inertia_tensor(&self) -> Mat3 {
        Mat3::from_diagonal_element(0.4 * self.radius * self.radius)
    }
}

/// Geometry owned by exactly one body.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
}

impl Shape {
    pub fn sphere(radius: f64) -> Self {
        Shape::Sphere(Sphere::new(radius))
    }

    /// Mass center in body-local coordinates.
    pub fn mass_center(&self) -> Vec3 {
        match self {
            Shape::Sphere(_) => Vec3::zeros(),
        }
    }

    /// Inertia tensor in body-local coordinates, independent of mass.
    ///
    /// Callers scale by the body's inverse mass after inverting.
    pub fn inertia_tensor(&self) -> Mat3 {
        match self {
            Shape::Sphere(s) => s.inertia_tensor(),
        }
    }

    /// Bounds in body-local coordinates.
    pub fn local_bounds(&self) -> Bounds {
        match self {
            Shape::Sphere(s) => Bounds::around(Vec3::zeros(), s.radius),
        }
    }

    /// World-space bounds for the shape placed at `position` with `orientation`.
    pub fn bounds(&self, position: &Vec3, _orientation: &Quat) -> Bounds {
        match self {
            Shape::Sphere(s) => Bounds::around(*position, s.radius),
        }
    }

    /// Sphere view of this shape, if it is one.
    pub fn as_sphere(&self) -> Option<&Sphere> {
        match self {
            Shape::Sphere(s) => Some(s),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_inertia_is_mass_normalized() {
        let shape = Shape::sphere(2.0);
        let inertia = shape.inertia_tensor();

        // (2/5) * r² = 0.4 * 4 = 1.6 on the diagonal
        for i in 0..3 {
            assert!((inertia[(i, i)] - 1.6).abs() < 1e-12);
        }
        assert_eq!(inertia[(0, 1)], 0.0);
        assert_eq!(inertia[(1, 2)], 0.0);
    }

    #[test]
    fn test_sphere_mass_center_at_origin() {
        assert_eq!(Shape::sphere(3.0).mass_center(), Vec3::zeros());
    }

    #[test]
    fn test_sphere_bounds_ignore_orientation() {
        let shape = Shape::sphere(1.0);
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let rotated = Quat::from_scaled_axis(Vec3::new(0.3, 1.2, -0.7));

        let a = shape.bounds(&pos, &Quat::identity());
        let b = shape.bounds(&pos, &rotated);

        assert_eq!(a, b);
        assert_eq!(a.mins, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(a.maxs, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_local_bounds() {
        let b = Shape::sphere(0.5).local_bounds();
        assert_eq!(b.mins, Vec3::repeat(-0.5));
        assert_eq!(b.maxs, Vec3::repeat(0.5));
    }

    #[test]
    fn test_as_sphere() {
        let shape = Shape::sphere(1.25);
        let sphere = shape.as_sphere().expect("sphere shape");
        assert_eq!(sphere.radius, 1.25);
    }
}
