//! Python bindings for the orb-core sphere physics engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from orb_physics import Simulation
//!
//! sim = Simulation()
//! ground = sim.spawn_static_sphere(0.0, 0.0, 0.0, 10.0)
//! ball = sim.spawn_sphere(0.0, 0.0, 15.0, 1.0, mass=2.0)
//! sim.attract_to(ground)
//!
//! for _ in range(100):
//!     sim.step(1.0 / 60.0)
//!     pos = sim.position(ball)
//!     print(f"Ball at ({pos.x}, {pos.y}, {pos.z})")
//! ```

use std::path::PathBuf;

use pyo3::exceptions::{PyIOError, PyKeyError, PyValueError};
use pyo3::prelude::*;

use orb_core::{
    Body, BodyHandle, ConfigError, MaterialLoader, SphereDesc, Vec3 as CoreVec3, World, WorldConfig,
};

fn config_error(err: ConfigError) -> PyErr {
    match err {
        ConfigError::IoError(_) | ConfigError::NotFound(_) => PyIOError::new_err(err.to_string()),
        ConfigError::ParseError(_) | ConfigError::Invalid(_) => {
            PyValueError::new_err(err.to_string())
        }
    }
}

fn unknown_body(handle: u64) -> PyErr {
    PyKeyError::new_err(format!("no body with handle {}", handle))
}

/// 3D vector for positions, velocities, etc.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).norm()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

/// Main simulation class.
///
/// Owns a world of spheres. Bodies are referred to by integer handles that
/// stay valid until the body is removed.
#[pyclass]
pub struct Simulation {
    world: World,
    materials: MaterialLoader,
}

impl Simulation {
    fn handle(&self, handle: u64) -> PyResult<BodyHandle> {
        self.body(handle).map(|_| BodyHandle::from_raw(handle))
    }

    fn body(&self, handle: u64) -> PyResult<&Body> {
        self.world
            .body(BodyHandle::from_raw(handle))
            .ok_or_else(|| unknown_body(handle))
    }
}

#[pymethods]
impl Simulation {
    /// Create a simulation, optionally from a YAML world configuration.
    ///
    /// Material presets are looked up in `materials_dir`.
    #[new]
    #[pyo3(signature = (config_path=None, materials_dir="materials"))]
    fn new(config_path: Option<PathBuf>, materials_dir: &str) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => WorldConfig::load(path).map_err(config_error)?,
            None => WorldConfig::default(),
        };
        log::debug!(
            "simulation created: gravity {:?}, pair finder {:?}",
            config.gravity,
            config.pair_finder
        );
        Ok(Self {
            world: World::new(config),
            materials: MaterialLoader::new(materials_dir),
        })
    }

    /// Current simulation time in seconds.
    #[getter]
    fn time(&self) -> f64 {
        self.world.time()
    }

    /// Number of bodies in the world.
    fn body_count(&self) -> usize {
        self.world.len()
    }

    /// Handles of all bodies, in storage order.
    fn handles(&self) -> Vec<u64> {
        self.world.handles().iter().map(|h| h.raw()).collect()
    }

    /// Add a dynamic sphere. Returns its handle.
    #[pyo3(signature = (x, y, z, radius, mass=1.0, restitution=1.0, friction=0.5))]
    fn spawn_sphere(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
        mass: f64,
        restitution: f64,
        friction: f64,
    ) -> PyResult<u64> {
        if !(radius > 0.0) {
            return Err(PyValueError::new_err("radius must be positive"));
        }
        if !(mass >= 0.0) {
            return Err(PyValueError::new_err("mass must be non-negative"));
        }
        let desc = SphereDesc {
            position: CoreVec3::new(x, y, z),
            radius,
            mass,
            restitution,
            friction,
        };
        Ok(self.world.spawn_sphere(desc).raw())
    }

    /// Add an immovable sphere. Returns its handle.
    #[pyo3(signature = (x, y, z, radius, restitution=1.0, friction=0.5))]
    fn spawn_static_sphere(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
        restitution: f64,
        friction: f64,
    ) -> PyResult<u64> {
        self.spawn_sphere(x, y, z, radius, 0.0, restitution, friction)
    }

    /// Add a sphere using a material preset by name (e.g. "rubber").
    #[pyo3(signature = (x, y, z, radius, material, mass=1.0))]
    fn spawn_with_material(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
        material: &str,
        mass: f64,
    ) -> PyResult<u64> {
        let material = self.materials.load(material).map_err(config_error)?;
        self.spawn_sphere(
            x,
            y,
            z,
            radius,
            mass,
            material.restitution,
            material.friction,
        )
    }

    /// Available material preset names.
    fn materials(&self) -> PyResult<Vec<String>> {
        self.materials.list().map_err(config_error)
    }

    /// Remove a body.
    fn remove(&mut self, handle: u64) -> PyResult<()> {
        let handle = self.handle(handle)?;
        self.world.remove(handle);
        Ok(())
    }

    /// Make gravity pull toward this body.
    fn attract_to(&mut self, handle: u64) -> PyResult<()> {
        let handle = self.handle(handle)?;
        self.world.attract_to(handle);
        Ok(())
    }

    /// Return gravity to the configured attractor point.
    fn release_attractor(&mut self) {
        self.world.release_attractor();
    }

    /// Body origin as Vec3.
    fn position(&self, handle: u64) -> PyResult<Vec3> {
        Ok(self.body(handle)?.position.into())
    }

    /// World-space mass center as Vec3, the point to render a body at.
    fn mass_center(&self, handle: u64) -> PyResult<Vec3> {
        Ok(self.body(handle)?.world_mass_center().into())
    }

    /// Body orientation as a `(w, x, y, z)` quaternion.
    fn orientation(&self, handle: u64) -> PyResult<(f64, f64, f64, f64)> {
        let body = self.body(handle)?;
        let q = body.orientation.quaternion();
        Ok((q.w, q.i, q.j, q.k))
    }

    /// Body linear velocity as Vec3.
    fn linear_velocity(&self, handle: u64) -> PyResult<Vec3> {
        let body = self.body(handle)?;
        Ok(body.linear_velocity.into())
    }

    /// Body angular velocity as Vec3 (rad/s).
    fn angular_velocity(&self, handle: u64) -> PyResult<Vec3> {
        let body = self.body(handle)?;
        Ok(body.angular_velocity.into())
    }

    /// Apply an impulse at a world point.
    fn apply_impulse(&mut self, handle: u64, point: Vec3, impulse: Vec3) -> PyResult<()> {
        if self
            .world
            .apply_impulse(BodyHandle::from_raw(handle), &point.into(), &impulse.into())
        {
            Ok(())
        } else {
            Err(unknown_body(handle))
        }
    }

    /// Change a body's mass. Zero makes it static.
    fn set_mass(&mut self, handle: u64, mass: f64) -> PyResult<()> {
        if !(mass >= 0.0) || !mass.is_finite() {
            return Err(PyValueError::new_err("mass must be finite and non-negative"));
        }
        if self.world.set_mass(BodyHandle::from_raw(handle), mass) {
            Ok(())
        } else {
            Err(unknown_body(handle))
        }
    }

    /// Remove every body. Simulation time keeps running.
    fn clear(&mut self) {
        self.world.clear();
    }

    /// Advance simulation by dt seconds. Returns the number of contacts.
    fn step(&mut self, dt: f64) -> usize {
        self.world.step(dt).contacts
    }

    /// Run multiple steps at once (more efficient).
    fn step_n(&mut self, dt: f64, steps: usize) -> usize {
        (0..steps).map(|_| self.world.step(dt).contacts).sum()
    }

    /// Get current state as dict for easy inspection.
    fn state_dict(&self) -> PyResult<PyObject> {
        Python::with_gil(|py| {
            let dict = pyo3::types::PyDict::new(py);
            dict.set_item("time", self.world.time())?;
            dict.set_item("body_count", self.world.len())?;

            let bodies = pyo3::types::PyList::empty(py);
            for (handle, body) in self.world.handles().iter().zip(self.world.bodies()) {
                let entry = pyo3::types::PyDict::new(py);
                entry.set_item("handle", handle.raw())?;
                entry.set_item("position", Vec3::from(body.position).to_tuple())?;
                entry.set_item("mass_center", Vec3::from(body.world_mass_center()).to_tuple())?;
                entry.set_item("velocity", Vec3::from(body.linear_velocity).to_tuple())?;
                entry.set_item("static", body.is_static())?;
                entry.set_item("kinetic_energy", body.kinetic_energy())?;
                bodies.append(entry)?;
            }
            dict.set_item("bodies", bodies)?;
            Ok(dict.into())
        })
    }
}

/// Python module definition.
#[pymodule]
fn orb_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<Simulation>()?;
    Ok(())
}
