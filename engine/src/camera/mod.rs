//! Camera System
//!
//! Orbit camera circling the machine, with free mouse look.

pub mod orbit;

pub use orbit::{OrbitCamera, ORBIT_HEIGHT, ORBIT_RADIUS, ORBIT_STEP};
