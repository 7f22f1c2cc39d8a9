//! Broadphase: cheap candidate pair generation.
//!
//! Every body's bounds are swept along its displacement for the step, padded,
//! and projected onto a single axis. Sorting the projected interval ends and
//! sweeping over them yields every pair whose intervals overlap on that axis.
//!
//! ```text
//! axis ──────────────────────────────────────────────▶
//!        [──── A ────]
//!              [─── B ───]          [── C ──]
//!
//! sorted: A.min  B.min  A.max  B.max  C.min  C.max
//! pairs:  (A, B)
//! ```
//!
//! Overlap on one axis does not imply overlap in 3D, so the output contains
//! false positives that narrow-phase rejects. It never misses a pair whose
//! swept bounds overlap.

use std::hash::{Hash, Hasher};

use crate::body::Body;
use crate::types::{normalize_or_zero, Bounds, Vec3};

/// Candidate pair of body indices. Equality ignores order.
#[derive(Debug, Clone, Copy, Eq)]
pub struct CollisionPair {
    pub a: usize,
    pub b: usize,
}

impl CollisionPair {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// The pair with the smaller index first.
    pub fn ordered(&self) -> (usize, usize) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

impl PartialEq for CollisionPair {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Hash for CollisionPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

/// One end of a body's projected interval.
#[derive(Debug, Clone, Copy)]
struct PseudoBody {
    id: usize,
    value: f64,
    is_min: bool,
}

/// Bounds of `body` over the step: current bounds grown by the displacement
/// `v·dt`, then padded by `margin` on every side. Static bodies do not sweep.
pub fn swept_bounds(body: &Body, dt: f64, margin: f64) -> Bounds {
    let mut bounds = body.bounds();

    let displacement = body.effective_velocity() * dt;
    bounds.expand(bounds.mins + displacement);
    bounds.expand(bounds.maxs + displacement);

    bounds.expand(bounds.mins - Vec3::repeat(margin));
    bounds.expand(bounds.maxs + Vec3::repeat(margin));
    bounds
}

/// Interval covered by `bounds` when projected onto `axis`.
///
/// Equals `(axis·mins, axis·maxs)` for axes with non-negative components.
fn project(bounds: &Bounds, axis: &Vec3) -> (f64, f64) {
    let lo = axis.component_mul(&bounds.mins);
    let hi = axis.component_mul(&bounds.maxs);
    (lo.inf(&hi).sum(), lo.sup(&hi).sum())
}

fn sort_bodies_bounds(bodies: &[Body], axis: &Vec3, dt: f64, margin: f64) -> Vec<PseudoBody> {
    let mut sorted = Vec::with_capacity(bodies.len() * 2);

    for (i, body) in bodies.iter().enumerate() {
        let (min, max) = project(&swept_bounds(body, dt, margin), axis);
        sorted.push(PseudoBody {
            id: i,
            value: min,
            is_min: true,
        });
        sorted.push(PseudoBody {
            id: i,
            value: max,
            is_min: false,
        });
    }

    // Stable: equal values keep body order, which keeps runs deterministic
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    sorted
}

fn build_pairs(sorted: &[PseudoBody]) -> Vec<CollisionPair> {
    let mut pairs = Vec::new();

    for (i, a) in sorted.iter().enumerate() {
        if !a.is_min {
            continue;
        }

        for b in &sorted[i + 1..] {
            // Reached the end of a's interval
            if b.id == a.id {
                break;
            }
            if b.is_min {
                pairs.push(CollisionPair::new(a.id, b.id));
            }
        }
    }

    pairs
}

/// Sort-and-sweep along `axis` (normalized here).
///
/// `margin` pads each swept box on both ends to absorb numerical tolerance.
pub fn find_pairs(bodies: &[Body], dt: f64, axis: &Vec3, margin: f64) -> Vec<CollisionPair> {
    let axis = normalize_or_zero(axis);
    let sorted = sort_bodies_bounds(bodies, &axis, dt, margin);
    build_pairs(&sorted)
}

/// Every unordered pair of distinct bodies.
pub fn all_pairs(bodies: &[Body]) -> Vec<CollisionPair> {
    let n = bodies.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for a in 0..n {
        for b in a + 1..n {
            pairs.push(CollisionPair::new(a, b));
        }
    }
    pairs
}

// =============================================================================
// Tests
// =============================================================================
