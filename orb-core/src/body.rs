//! Rigid body state and integration.
//!
//! A [`Body`] owns exactly one [`Shape`] and tracks pose (position and
//! orientation) plus linear and angular velocity. Immovable bodies are
//! represented by a mass of zero, which makes the inverse mass and the world
//! inverse inertia tensor zero as well, so every impulse response on them
//! vanishes.
//!
//! ## Integration
//!
//! [`Body::update`] advances the body with explicit Euler on velocities, then
//! swings the body around its world mass center by the incremental rotation
//! `ω·dt`:
//!
//! ```text
//! 1. x     += v·dt
//! 2. I_w    = R·I·Rᵀ
//!    ω     += I_w⁻¹·(ω × I_w·ω)·dt
//! 3. Δq     = quat(ω·dt)
//!    q      = normalize(Δq·q)
//! 4. x      = c + Δq·(x - c)        c = world mass center
//! ```

use crate::materials::Material;
use crate::shape::Shape;
use crate::types::{constants, inverse_or_zero, Bounds, Mat3, Quat, Vec3};

/// A rigid body with linear and angular dynamics.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,

    /// Coefficient of restitution ("elasticity").
    pub restitution: f64,
    pub friction: f64,

    shape: Shape,
    mass: f64,
    inverse_mass: f64,
}

impl Body {
    /// A dynamic body of unit mass at the origin.
    pub fn new(shape: Shape) -> Self {
        let material = Material::default();
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            restitution: material.restitution,
            friction: material.friction,
            shape,
            mass: 1.0,
            inverse_mass: 1.0,
        }
    }

    /// Builder: set initial position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder: set initial orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Builder: set initial linear velocity.
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Builder: set initial angular velocity (rad/s).
    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Builder: set mass. Zero makes the body static.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.set_mass(mass);
        self
    }

    /// Builder: set restitution.
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// Builder: set friction coefficient.
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Builder: copy restitution and friction from a material.
    pub fn with_material(mut self, material: &Material) -> Self {
        self.restitution = material.restitution;
        self.friction = material.friction;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    /// Set the mass; zero marks the body as static and stops it.
    ///
    /// Negative or non-finite masses are treated as zero.
    pub fn set_mass(&mut self, mass: f64) {
        let mass = if mass.is_finite() && mass > 0.0 {
            mass
        } else {
            if mass != 0.0 {
                log::warn!("invalid mass {}, making body static", mass);
            }
            0.0
        };

        self.mass = mass;
        if mass == 0.0 {
            self.inverse_mass = 0.0;
            self.linear_velocity = Vec3::zeros();
            self.angular_velocity = Vec3::zeros();
        } else {
            self.inverse_mass = 1.0 / mass;
        }
    }

    /// Velocity the body actually moves with: zero for static bodies.
    pub fn effective_velocity(&self) -> Vec3 {
        if self.is_static() {
            Vec3::zeros()
        } else {
            self.linear_velocity
        }
    }

    /// Velocity of the point at offset `r` from the world mass center,
    /// `v + ω × r`. Zero for static bodies.
    pub fn point_velocity(&self, r: &Vec3) -> Vec3 {
        if self.is_static() {
            Vec3::zeros()
        } else {
            self.linear_velocity + self.angular_velocity.cross(r)
        }
    }

    /// Advance pose and velocity by `dt`. Static bodies do not move.
    pub fn update(&mut self, dt: f64) {
        if self.is_static() {
            return;
        }

        self.position += self.linear_velocity * dt;

        let mass_center = self.world_mass_center();
        let center_to_position = self.position - mass_center;

        // Gyroscopic term of the torque-free rigid body
        let orient = self.orientation.to_rotation_matrix().into_inner();
        let inertia = orient * self.shape.inertia_tensor() * orient.transpose();
        let alpha = inverse_or_zero(&inertia)
            * self.angular_velocity.cross(&(inertia * self.angular_velocity));
        self.angular_velocity += alpha * dt;

        let delta_orientation = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.orientation = delta_orientation * self.orientation;
        self.orientation.renormalize();

        self.position = mass_center + delta_orientation * center_to_position;
    }

    pub fn local_mass_center(&self) -> Vec3 {
        self.shape.mass_center()
    }

    pub fn world_mass_center(&self) -> Vec3 {
        self.position + self.orientation * self.shape.mass_center()
    }

    /// `I⁻¹·m⁻¹` in body coordinates; zero for static bodies.
    pub fn local_inverse_inertia_tensor(&self) -> Mat3 {
        inverse_or_zero(&self.shape.inertia_tensor()) * self.inverse_mass
    }

    /// `R·(I⁻¹·m⁻¹)·Rᵀ`; zero for static bodies.
    pub fn world_inverse_inertia_tensor(&self) -> Mat3 {
        let orient = self.orientation.to_rotation_matrix().into_inner();
        orient * self.local_inverse_inertia_tensor() * orient.transpose()
    }

    /// Express a world point relative to the mass center in body axes.
    pub fn world_to_local(&self, world_point: &Vec3) -> Vec3 {
        self.orientation
            .inverse_transform_vector(&(world_point - self.world_mass_center()))
    }

    /// Inverse of [`Body::world_to_local`].
    pub fn local_to_world(&self, local_point: &Vec3) -> Vec3 {
        self.world_mass_center() + self.orientation * local_point
    }

    /// World bounds of the shape at the current pose.
    pub fn bounds(&self) -> Bounds {
        self.shape.bounds(&self.position, &self.orientation)
    }

    /// Apply an impulse at a world-space point, changing both linear and
    /// angular velocity.
    pub fn apply_impulse(&mut self, origin: &Vec3, impulse: &Vec3) {
        if self.is_static() {
            return;
        }

        self.apply_linear_impulse(impulse);

        let r = origin - self.world_mass_center();
        let angular_impulse = r.cross(impulse);
        self.apply_angular_impulse(&angular_impulse);
    }

    /// `Δv = J·m⁻¹`
    pub fn apply_linear_impulse(&mut self, impulse: &Vec3) {
        if self.is_static() {
            return;
        }

        self.linear_velocity += impulse * self.inverse_mass;
    }

    /// `Δω = I_w⁻¹·L`, then clamp |ω| to [`constants::MAX_ANGULAR_SPEED`].
    pub fn apply_angular_impulse(&mut self, impulse: &Vec3) {
        if self.is_static() {
            return;
        }

        self.angular_velocity += self.world_inverse_inertia_tensor() * impulse;

        let max = constants::MAX_ANGULAR_SPEED;
        if self.angular_velocity.norm_squared() > max * max {
            self.angular_velocity = self.angular_velocity.normalize() * max;
        }
    }

    /// Translational plus rotational kinetic energy.
    pub fn kinetic_energy(&self) -> f64 {
        let translational = 0.5 * self.mass * self.linear_velocity.norm_squared();

        let orient = self.orientation.to_rotation_matrix().into_inner();
        let inertia = orient * (self.shape.inertia_tensor() * self.mass) * orient.transpose();
        let rotational = 0.5 * self.angular_velocity.dot(&(inertia * self.angular_velocity));

        translational + rotational
    }
}

// =============================================================================
// Tests
// =============================================================================
