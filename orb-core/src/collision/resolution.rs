//! Impulse response for a single [`Contact`].
//!
//! Applied in a fixed order:
//! 1. Normal impulse, restitution `e = e_A·e_B`
//! 2. Friction impulse along the tangential relative velocity, `μ = μ_A·μ_B`
//! 3. Positional correction, only for contacts at the start of a sub-step
//!    (`impact_time == 0`)
//!
//! ## Normal Impulse
//!
//! ```text
//! r      = contact point - mass center          (per body)
//! k_ang  = ((I_A⁻¹·(r_A × n)) × r_A + (I_B⁻¹·(r_B × n)) × r_B) · n
//! v_rel  = (v_A + ω_A × r_A) - (v_B + ω_B × r_B)
//! J      = (1 + e)·(v_rel · n) / (m_A⁻¹ + m_B⁻¹ + k_ang)
//!
//! A receives -J·n, B receives +J·n
//! ```
//!
//! Impulses go through [`Body::apply_impulse`], so static bodies never react.
//! A pair already moving apart (`v_rel · n > 0`) gets no impulse. A static
//! body contributes no velocity, whatever its stored velocity.

use crate::body::Body;
use crate::collision::Contact;
use crate::types::{normalize_or_zero, Vec3};

/// `(I⁻¹·(r × axis)) × r` for one body.
fn angular_term(body: &Body, r: &Vec3, axis: &Vec3) -> Vec3 {
    (body.world_inverse_inertia_tensor() * r.cross(axis)).cross(r)
}

impl Contact {
    /// Resolve this contact between `a` (at `body_a`) and `b` (at `body_b`).
    pub fn resolve(&self, a: &mut Body, b: &mut Body) {
        let inverse_mass_a = a.inverse_mass();
        let inverse_mass_b = b.inverse_mass();
        let inverse_mass_sum = inverse_mass_a + inverse_mass_b;
        if inverse_mass_sum == 0.0 {
            return;
        }

        let n = self.normal;
        let r_a = self.world_point_a - a.world_mass_center();
        let r_b = self.world_point_b - b.world_mass_center();

        let relative_vel = a.point_velocity(&r_a) - b.point_velocity(&r_b);

        // Touching but already separating: no impulse
        let approach = relative_vel.dot(&n);
        let mut impulse_j = 0.0;
        let mut impulse_friction = Vec3::zeros();

        if approach <= 0.0 {
            // Normal
            let elasticity = a.restitution * b.restitution;
            let angular_factor =
                (angular_term(a, &r_a, &n) + angular_term(b, &r_b, &n)).dot(&n);
            impulse_j = (1.0 + elasticity) * approach / (inverse_mass_sum + angular_factor);
            let impulse = n * impulse_j;

            a.apply_impulse(&self.world_point_a, &(-impulse));
            b.apply_impulse(&self.world_point_b, &impulse);

            // Friction
            let friction = a.friction * b.friction;
            let vel_tangent = relative_vel - n * approach;
            let tangent = normalize_or_zero(&vel_tangent);

            let inverse_inertia = (angular_term(a, &r_a, &tangent)
                + angular_term(b, &r_b, &tangent))
            .dot(&tangent);
            let reduced_mass = 1.0 / (inverse_mass_sum + inverse_inertia);
            impulse_friction = vel_tangent * reduced_mass * friction;

            a.apply_impulse(&self.world_point_a, &(-impulse_friction));
            b.apply_impulse(&self.world_point_b, &impulse_friction);
        }

        // Push apart, lighter body moves more
        if self.impact_time == 0.0 {
            let share_a = inverse_mass_a / inverse_mass_sum;
            let share_b = inverse_mass_b / inverse_mass_sum;

            let ds = self.world_point_b - self.world_point_a;
            a.position += ds * share_a;
            b.position -= ds * share_b;
        }

        log::trace!(
            "resolved contact {}-{} at t={:.6}: J={:.6}, friction={:.6}",
            self.body_a,
            self.body_b,
            self.impact_time,
            impulse_j,
            impulse_friction.norm()
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadphase::CollisionPair;
    use crate::collision::intersect;
    use crate::shape::Shape;
    use approx::assert_relative_eq;

    fn sphere(position: Vec3, velocity: Vec3, mass: f64) -> Body {
        Body::new(Shape::sphere(1.0))
            .with_position(position)
            .with_linear_velocity(velocity)
            .with_mass(mass)
    }

    fn contact(point: Vec3, normal: Vec3, impact_time: f64) -> Contact {
        Contact {
            body_a: 0,
            body_b: 1,
            world_point_a: point,
            world_point_b: point,
            local_point_a: Vec3::zeros(),
            local_point_b: Vec3::zeros(),
            normal,
            separation: 0.0,
            impact_time,
        }
    }

    #[test]
    fn test_head_on_equal_masses_swap_velocities() {
        let mut a = sphere(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 1.0);
        let mut b = sphere(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0), 1.0);

        let c = contact(Vec3::zeros(), Vec3::new(-1.0, 0.0, 0.0), 0.1);
        c.resolve(&mut a, &mut b);

        assert_relative_eq!(a.linear_velocity, Vec3::new(-5.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(b.linear_velocity, Vec3::new(5.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(a.angular_velocity, Vec3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_falling_sphere_bounces_off_static() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -20.0), 1.0)
            .with_restitution(0.5);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 0.0);

        let c = intersect(CollisionPair::new(0, 1), &a, &b, 1.0).unwrap();
        a.update(c.impact_time);
        c.resolve(&mut a, &mut b);

        // e = 0.5 · 1.0
        assert!(
            (a.linear_velocity.z - 10.0).abs() < 1e-9,
            "Expected vz=10 after bounce, got {}",
            a.linear_velocity.z
        );
        assert_eq!(b.linear_velocity, Vec3::zeros());
        assert_eq!(b.angular_velocity, Vec3::zeros());
        assert_eq!(b.position, Vec3::zeros());
    }

    #[test]
    fn test_momentum_conserved_between_dynamic_bodies() {
        let mut a = sphere(Vec3::new(-1.0, 0.3, 0.0), Vec3::new(4.0, -1.0, 0.5), 2.0);
        let mut b = sphere(Vec3::new(0.9, -0.2, 0.1), Vec3::new(-3.0, 2.0, 0.0), 3.0);
        let momentum_before = a.linear_velocity * a.mass() + b.linear_velocity * b.mass();

        let normal = (a.position - b.position).normalize();
        let mut c = contact(Vec3::zeros(), normal, 0.05);
        c.world_point_a = a.position - normal;
        c.world_point_b = b.position + normal;
        c.resolve(&mut a, &mut b);

        let momentum_after = a.linear_velocity * a.mass() + b.linear_velocity * b.mass();
        assert_relative_eq!(momentum_before, momentum_after, epsilon = 1e-9);
    }

    #[test]
    fn test_friction_slows_sliding_contact() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 2.0), Vec3::new(3.0, 0.0, -5.0), 1.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 0.0);

        let c = contact(Vec3::new(0.0, 0.0, 1.0), Vec3::z(), 0.01);
        c.resolve(&mut a, &mut b);

        assert!(a.linear_velocity.x < 3.0, "Friction should reduce sliding");
        assert!(a.linear_velocity.x > 0.0, "Friction should not reverse sliding");
        assert!(a.angular_velocity.y > 0.0, "Friction should spin the sphere");
        assert!((a.linear_velocity.z - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_frictionless_keeps_tangential_velocity() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 2.0), Vec3::new(3.0, 0.0, -5.0), 1.0)
            .with_friction(0.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 0.0);

        let c = contact(Vec3::new(0.0, 0.0, 1.0), Vec3::z(), 0.01);
        c.resolve(&mut a, &mut b);

        assert!((a.linear_velocity.x - 3.0).abs() < 1e-12);
        assert_eq!(a.angular_velocity, Vec3::zeros());
    }

    #[test]
    fn test_positional_correction_split_by_inverse_mass() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 1.9), Vec3::zeros(), 1.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 3.0);

        let c = intersect(CollisionPair::new(0, 1), &a, &b, 0.016).unwrap();
        assert_eq!(c.impact_time, 0.0);
        c.resolve(&mut a, &mut b);

        // 0.1 overlap, A takes 3/4 of it
        assert!((a.position.z - 1.975).abs() < 1e-9, "A at {}", a.position.z);
        assert!((b.position.z + 0.025).abs() < 1e-9, "B at {}", b.position.z);
        assert!((a.position.z - b.position.z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_static_body_not_pushed() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 1.9), Vec3::zeros(), 1.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 0.0);

        let c = intersect(CollisionPair::new(0, 1), &a, &b, 0.016).unwrap();
        c.resolve(&mut a, &mut b);

        assert_eq!(b.position, Vec3::zeros());
        assert!((a.position.z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_positional_correction_mid_step() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 1.9), Vec3::zeros(), 1.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 1.0);

        let mut c = contact(Vec3::new(0.0, 0.0, 0.9), Vec3::z(), 0.05);
        c.world_point_b = Vec3::new(0.0, 0.0, 1.0);
        c.resolve(&mut a, &mut b);

        assert_eq!(a.position, Vec3::new(0.0, 0.0, 1.9));
        assert_eq!(b.position, Vec3::zeros());
    }

    #[test]
    fn test_two_static_bodies_untouched() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 1.5), Vec3::zeros(), 0.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 0.0);
        let (a0, b0) = (a.clone(), b.clone());

        let mut c = contact(Vec3::new(0.0, 0.0, 0.5), Vec3::z(), 0.0);
        c.world_point_b = Vec3::new(0.0, 0.0, 1.0);
        c.resolve(&mut a, &mut b);

        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_separating_contact_gets_no_impulse() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 3.0), 1.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 1.0);

        let c = contact(Vec3::new(0.0, 0.0, 1.0), Vec3::z(), 0.02);
        c.resolve(&mut a, &mut b);

        assert_eq!(a.linear_velocity, Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(b.linear_velocity, Vec3::zeros());
    }

    #[test]
    fn test_static_stored_velocity_ignored() {
        let mut a = sphere(Vec3::new(0.0, 0.0, 2.0), Vec3::zeros(), 1.0);
        let mut b = sphere(Vec3::zeros(), Vec3::zeros(), 0.0)
            .with_linear_velocity(Vec3::new(0.0, 0.0, 50.0));

        let c = contact(Vec3::new(0.0, 0.0, 1.0), Vec3::z(), 0.02);
        c.resolve(&mut a, &mut b);

        assert_eq!(a.linear_velocity, Vec3::zeros());
    }
}
