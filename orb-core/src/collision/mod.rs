//! Collision detection and resolution.
//!
//! This module handles:
//! - **Detection**: whether, when and where two bodies touch during a step
//!   (continuous, swept spheres)
//! - **Resolution**: the impulses and position fix-up for one [`Contact`]
//!
//! ## Swept Sphere Algorithm
//!
//! Testing overlap only at the end of a step lets fast spheres pass through
//! each other. Instead, sphere A is swept relative to B and the sweep is
//! intersected with B grown by A's radius:
//!
//! ```text
//! Time t=0                     Time t=dt
//!    A ─────────────╳──────────▶ A'
//!                 ╭─┴─╮
//!                 │ B │  radius = r_A + r_B
//!                 ╰───╯
//!                   └─ first hit gives the impact time
//! ```
//!
//! This detects collisions regardless of speed or timestep size.

pub mod detection;
pub mod resolution;

pub use detection::*;

use std::cmp::Ordering;

use crate::types::Vec3;

/// A collision event inside the current step.
///
/// Bodies are referenced by their index in the world's body list. The normal
/// points from B toward A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: usize,
    pub body_b: usize,

    pub world_point_a: Vec3,
    pub world_point_b: Vec3,
    pub local_point_a: Vec3,
    pub local_point_b: Vec3,

    pub normal: Vec3,
    /// Gap between the surfaces at the impact time (negative when overlapping).
    pub separation: f64,
    /// Seconds from the start of the step, in `[0, dt]`.
    pub impact_time: f64,
}

impl Contact {
    /// Order by impact time, earliest first.
    pub fn cmp_impact_time(&self, other: &Self) -> Ordering {
        self.impact_time.total_cmp(&other.impact_time)
    }
}

/// Sort contacts by impact time. Ties keep their detection order.
pub fn sort_by_impact_time(contacts: &mut [Contact]) {
    contacts.sort_by(Contact::cmp_impact_time);
}
