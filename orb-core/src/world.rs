//! The world: body storage and the time-ordered step.
//!
//! One call to [`World::step`] consumes a whole frame `dt`:
//!
//! ```text
//! gravity ─▶ broadphase ─▶ narrow-phase ─▶ sort by impact time
//!                                              │
//!        ┌─────────────────────────────────────┘
//!        ▼
//!   for each contact:  integrate(t_i - t_prev) ─▶ resolve
//!        │
//!        ▼
//!   integrate(dt - t_last)
//! ```
//!
//! Bodies are only ever advanced up to the next contact, so an impact is
//! resolved before anything integrates past it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::body::Body;
use crate::broadphase::{all_pairs, find_pairs, CollisionPair};
use crate::collision::{intersect, sort_by_impact_time, Contact};
use crate::config::{PairFinder, WorldConfig};
use crate::forces::GravityField;
use crate::materials::Material;
use crate::shape::Shape;
use crate::types::Vec3;

/// Stable reference to a body in a [`World`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u64);

impl BodyHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Parameters for [`World::spawn_sphere`].
#[derive(Debug, Clone, PartialEq)]
pub struct SphereDesc {
    pub position: Vec3,
    pub radius: f64,
    /// Zero makes the sphere static.
    pub mass: f64,
    pub restitution: f64,
    pub friction: f64,
}

impl SphereDesc {
    pub fn new(position: Vec3, radius: f64) -> Self {
        Self {
            position,
            radius,
            ..Self::default()
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_material(mut self, material: &Material) -> Self {
        self.restitution = material.restitution;
        self.friction = material.friction;
        self
    }

    pub fn into_body(self) -> Body {
        Body::new(Shape::sphere(self.radius))
            .with_position(self.position)
            .with_mass(self.mass)
            .with_restitution(self.restitution)
            .with_friction(self.friction)
    }
}

impl Default for SphereDesc {
    fn default() -> Self {
        let material = Material::default();
        Self {
            position: Vec3::zeros(),
            radius: 1.0,
            mass: 1.0,
            restitution: material.restitution,
            friction: material.friction,
        }
    }
}

/// What happened during one [`World::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    pub candidate_pairs: usize,
    pub contacts: usize,
    /// Wall-clock time spent in the step.
    pub elapsed: Duration,
}

/// Owns the bodies and advances them through time.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    bodies: Vec<Body>,
    handles: Vec<BodyHandle>,
    /// Handle to position in `bodies`.
    indices: HashMap<BodyHandle, usize>,
    next_handle: u64,
    attractor: Option<BodyHandle>,
    time: f64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            handles: Vec::new(),
            indices: HashMap::new(),
            next_handle: 0,
            attractor: None,
            time: 0.0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Simulated seconds since creation.
    pub fn time(&self) -> f64 {
        self.time
    }

    // =========================================================================
    // Bodies
    // =========================================================================

    pub fn spawn(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;

        log::debug!(
            "spawned body {} at {:?} (mass {})",
            handle.0,
            body.position,
            body.mass()
        );

        self.indices.insert(handle, self.bodies.len());
        self.bodies.push(body);
        self.handles.push(handle);
        handle
    }

    pub fn spawn_sphere(&mut self, desc: SphereDesc) -> BodyHandle {
        self.spawn(desc.into_body())
    }

    /// Remove a body. Remaining bodies keep their relative order.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let index = self.indices.remove(&handle)?;
        self.handles.remove(index);
        let body = self.bodies.remove(index);
        for (i, h) in self.handles.iter().enumerate().skip(index) {
            self.indices.insert(*h, i);
        }

        if self.attractor == Some(handle) {
            self.attractor = None;
        }

        log::debug!("removed body {}", handle.0);
        Some(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.index_of(handle).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.index_of(handle).map(move |i| &mut self.bodies[i])
    }

    /// Handles in storage order, matching [`World::bodies`].
    pub fn handles(&self) -> &[BodyHandle] {
        &self.handles
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drop every body. Handles already issued stay invalid.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.handles.clear();
        self.indices.clear();
        self.attractor = None;
    }

    /// Apply an impulse at a world point. `false` if the handle is unknown.
    pub fn apply_impulse(&mut self, handle: BodyHandle, point: &Vec3, impulse: &Vec3) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.apply_impulse(point, impulse);
                true
            }
            None => false,
        }
    }

    /// Change a body's mass; zero makes it static and stops it. `false` if the
    /// handle is unknown or the mass is negative or not finite.
    pub fn set_mass(&mut self, handle: BodyHandle, mass: f64) -> bool {
        if !mass.is_finite() || mass < 0.0 {
            return false;
        }
        match self.body_mut(handle) {
            Some(body) => {
                body.set_mass(mass);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Gravity
    // =========================================================================

    /// Make a central field follow `handle`'s mass center every step.
    pub fn attract_to(&mut self, handle: BodyHandle) -> bool {
        if self.index_of(handle).is_none() {
            return false;
        }
        self.attractor = Some(handle);
        true
    }

    /// Go back to the configured attractor point.
    pub fn release_attractor(&mut self) {
        self.attractor = None;
    }

    pub fn attractor(&self) -> Option<BodyHandle> {
        self.attractor
    }

    /// Field in effect for the next step.
    pub fn gravity(&self) -> GravityField {
        match self.attractor.and_then(|h| self.body(h)) {
            Some(body) => self.config.gravity.centered_on(body.world_mass_center()),
            None => self.config.gravity,
        }
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance the world by `dt` seconds.
    ///
    /// Non-positive or non-finite `dt` leaves the world untouched.
    pub fn step(&mut self, dt: f64) -> StepStats {
        if dt <= 0.0 || !dt.is_finite() {
            log::warn!("ignoring step with dt = {}", dt);
            return StepStats::default();
        }
        let started = Instant::now();

        self.gravity().apply(&mut self.bodies, dt);

        let pairs = self.candidate_pairs(dt);
        let mut contacts = self.narrow_phase(&pairs, dt);
        sort_by_impact_time(&mut contacts);

        let mut accumulated_time = 0.0;
        for contact in &contacts {
            self.integrate(contact.impact_time - accumulated_time);

            let (a, b) = pair_mut(&mut self.bodies, contact.body_a, contact.body_b);
            contact.resolve(a, b);

            accumulated_time = contact.impact_time;
        }
        self.integrate(dt - accumulated_time);

        self.time += dt;

        let stats = StepStats {
            candidate_pairs: pairs.len(),
            contacts: contacts.len(),
            elapsed: started.elapsed(),
        };
        log::trace!(
            "step dt={} pairs={} contacts={} in {:?}",
            dt,
            stats.candidate_pairs,
            stats.contacts,
            stats.elapsed
        );
        stats
    }

    fn candidate_pairs(&self, dt: f64) -> Vec<CollisionPair> {
        match self.config.pair_finder {
            PairFinder::SortAndSweep => find_pairs(
                &self.bodies,
                dt,
                &self.config.sweep_axis,
                self.config.broadphase_margin,
            ),
            PairFinder::BruteForce => all_pairs(&self.bodies),
        }
    }

    fn narrow_phase(&self, pairs: &[CollisionPair], dt: f64) -> Vec<Contact> {
        pairs
            .iter()
            .filter_map(|pair| {
                let a = &self.bodies[pair.a];
                let b = &self.bodies[pair.b];

                // Two immovable bodies never respond
                if a.is_static() && b.is_static() {
                    return None;
                }
                intersect(*pair, a, b, dt)
            })
            .collect()
    }

    fn integrate(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        for body in &mut self.bodies {
            body.update(dt);
        }
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.indices.get(&handle).copied()
    }
}

/// Two distinct bodies borrowed mutably at once.
fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(a, b, "a contact needs two distinct bodies");
    if a < b {
        let (head, tail) = bodies.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

// =============================================================================
// Tests
// =============================================================================
