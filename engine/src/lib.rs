//! Claw Machine Engine Library
//!
//! Everything except the window loop: deterministic simulation, scene
//! composition, mesh import, camera, input, and wgpu plumbing.
//!
//! # Modules
//!
//! - [`sim`] - Game phase machine, claw kinematics, toy physics
//! - [`scene`] - Pure composer from sim state to ordered draw commands
//! - [`mesh`] - OBJ import with normalization, procedural primitives
//! - [`camera`] - Orbit camera with free mouse look
//! - [`input`] - winit-facing input state and the per-tick snapshot
//! - [`render`] - GPU context, scene renderer, WGSL shader, textures
//! - [`config`] - Optional JSON configuration with defaults
//!
//! # Example
//!
//! ```ignore
//! use claw_machine_engine::input::InputSnapshot;
//! use claw_machine_engine::sim::{tick, SimState};
//!
//! let mut state = SimState::new();
//! let snapshot = InputSnapshot::default();
//! tick(&mut state, &snapshot, /* facing_front */ true);
//! ```

pub mod camera;
pub mod config;
pub mod input;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod sim;

// Re-export the types the binary wires together.
pub use camera::OrbitCamera;
pub use config::AppConfig;
pub use input::{GameAction, InputSnapshot, InputState};
pub use mesh::{MeshData, MeshVertex};
pub use render::{GpuContext, SceneRenderer};
pub use scene::{compose, DrawList, MeshCatalog};
pub use sim::{tick, SimState};
