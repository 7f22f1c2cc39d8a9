//! Continuous narrow-phase for sphere pairs.
//!
//! Works in B's rest frame: A travels along `(v_A - v_B)·dt` and hits B when
//! that ray enters a sphere of radius `r_A + r_B` around B. Nearly static
//! pairs skip the ray and use a plain overlap test.

use crate::body::Body;
use crate::broadphase::CollisionPair;
use crate::collision::Contact;
use crate::shape::Sphere;
use crate::types::{constants, Vec3};

/// Where and when two spheres first touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereImpact {
    /// Surface point of A facing B at the impact time.
    pub point_a: Vec3,
    /// Surface point of B facing A at the impact time.
    pub point_b: Vec3,
    /// Unit vector from B's center toward A's.
    pub normal: Vec3,
    pub impact_time: f64,
}

/// Ray against sphere.
///
/// Returns the entry and exit parameters `(t0, t1)` along `dir`, where `t = 1`
/// is `origin + dir`. Either may be negative. `None` when the line misses the
/// sphere or `dir` is degenerate.
pub fn ray_sphere(origin: &Vec3, dir: &Vec3, center: &Vec3, radius: f64) -> Option<(f64, f64)> {
    let s = center - origin;
    let a = dir.dot(dir);
    if a < constants::EPSILON {
        return None;
    }
    let b = s.dot(dir);
    let c = s.dot(&s) - radius * radius;

    let delta = b * b - a * c;
    if delta < 0.0 {
        return None;
    }

    let inverse_a = 1.0 / a;
    let delta_root = delta.sqrt();
    Some(((b - delta_root) * inverse_a, (b + delta_root) * inverse_a))
}

/// Time of impact of two linearly moving spheres within `[0, dt]`.
///
/// Returns `None` when they do not touch during the step, including pairs
/// that already passed each other (`t1 < 0`).
pub fn dynamic_sphere_to_sphere(
    sphere_a: &Sphere,
    sphere_b: &Sphere,
    pos_a: &Vec3,
    pos_b: &Vec3,
    vel_a: &Vec3,
    vel_b: &Vec3,
    dt: f64,
) -> Option<SphereImpact> {
    let relative_vel = vel_a - vel_b;
    let ray_dir = relative_vel * dt;
    let radius_sum = sphere_a.radius + sphere_b.radius;

    let (t0, t1) = if ray_dir.norm_squared() <= constants::MIN_SWEEP_LENGTH.powi(2) {
        // Ray too short, plain overlap test
        let reach = radius_sum + constants::OVERLAP_SLOP;
        if (pos_b - pos_a).norm_squared() > reach * reach {
            return None;
        }
        (0.0, 0.0)
    } else {
        ray_sphere(pos_a, &ray_dir, pos_b, radius_sum)?
    };

    // From the ray's [0, 1] to [0, dt]
    let (t0, t1) = (t0 * dt, t1 * dt);

    if t1 < 0.0 {
        return None;
    }

    let impact_time = t0.max(0.0);
    if impact_time > dt {
        return None;
    }

    let new_pos_a = pos_a + vel_a * impact_time;
    let new_pos_b = pos_b + vel_b * impact_time;
    let normal = (new_pos_a - new_pos_b)
        .try_normalize(constants::EPSILON)
        .unwrap_or_else(Vec3::z);

    Some(SphereImpact {
        point_a: new_pos_a - normal * sphere_a.radius,
        point_b: new_pos_b + normal * sphere_b.radius,
        normal,
        impact_time,
    })
}

/// Narrow-phase for a broadphase candidate.
///
/// `a` and `b` must be the bodies at `pair.a` and `pair.b`. Positions are
/// extrapolated linearly to the impact time; the bodies are not advanced.
/// Static bodies are treated as at rest whatever their stored velocity.
pub fn intersect(pair: CollisionPair, a: &Body, b: &Body, dt: f64) -> Option<Contact> {
    let (Some(sphere_a), Some(sphere_b)) = (a.shape().as_sphere(), b.shape().as_sphere()) else {
        return None;
    };

    let center_a = a.world_mass_center();
    let center_b = b.world_mass_center();
    let vel_a = a.effective_velocity();
    let vel_b = b.effective_velocity();

    let impact =
        dynamic_sphere_to_sphere(sphere_a, sphere_b, &center_a, &center_b, &vel_a, &vel_b, dt)?;

    let center_a = center_a + vel_a * impact.impact_time;
    let center_b = center_b + vel_b * impact.impact_time;

    let separation = (center_a - center_b).norm() - (sphere_a.radius + sphere_b.radius);

    Some(Contact {
        body_a: pair.a,
        body_b: pair.b,
        world_point_a: impact.point_a,
        world_point_b: impact.point_b,
        local_point_a: a
            .orientation
            .inverse_transform_vector(&(impact.point_a - center_a)),
        local_point_b: b
            .orientation
            .inverse_transform_vector(&(impact.point_b - center_b)),
        normal: impact.normal,
        separation,
        impact_time: impact.impact_time,
    })
}

// =============================================================================
// Tests
// =============================================================================
