//! Scene Composition
//!
//! Pure translation from simulation state to an ordered list of draw
//! commands. No GPU types in here; the renderer executes the list.

pub mod composer;

pub use composer::{
    compose, finger_open_angle_deg, lamp_color, DrawCommand, DrawList, MeshCatalog, MeshId,
};
