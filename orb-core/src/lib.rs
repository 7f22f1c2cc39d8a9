//! # Orb Core
//!
//! A rigid-body physics engine for spheres with continuous collision
//! detection: fast bodies cannot tunnel through each other within a step.
//!
//! ## Architecture
//!
//! - `types`: Numeric aliases (nalgebra), `Bounds`, constants
//! - `shape`: Collision shapes and their inertia
//! - `body`: Rigid body state, integration and impulses
//! - `broadphase`: Sort-and-sweep candidate pairs
//! - `collision`: Swept-sphere detection and impulse resolution
//! - `forces`: Gravity fields
//! - `config`: YAML world configuration
//! - `materials`: YAML-based material presets
//! - `world`: Body storage and the time-ordered step
//!
//! ```no_run
//! use orb_core::{SphereDesc, Vec3, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::default());
//! let ball = world.spawn_sphere(SphereDesc::new(Vec3::new(0.0, 0.0, 5.0), 1.0));
//! world.spawn_sphere(SphereDesc::new(Vec3::zeros(), 1.0).with_mass(0.0));
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0);
//! }
//! println!("{:?}", world.body(ball).map(|b| b.position));
//! ```

pub mod body;
pub mod broadphase;
pub mod collision;
pub mod config;
pub mod forces;
pub mod materials;
pub mod shape;
pub mod types;
pub mod world;

pub use body::Body;
pub use collision::Contact;
pub use config::{ConfigError, PairFinder, WorldConfig};
pub use forces::GravityField;
pub use materials::{Material, MaterialLoader};
pub use shape::{Shape, Sphere};
pub use types::{Bounds, Mat3, Quat, Vec3};
pub use world::{BodyHandle, SphereDesc, StepStats, World};
