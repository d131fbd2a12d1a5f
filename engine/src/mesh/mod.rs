//! Mesh System
//!
//! CPU-side mesh data: the shared vertex layout, a Wavefront OBJ importer
//! that normalizes models into a unit cube, and procedural fallback
//! primitives for when no model file is available.

pub mod obj;
pub mod primitives;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use static_assertions::assert_eq_size;

pub use obj::{load_obj, load_obj_candidates, MeshError};
pub use primitives::{unit_cube, uv_sphere};

/// Vertex layout shared by every mesh in the game.
/// Must match the vertex buffer layout declared by the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

// 8 floats, tightly packed
assert_eq_size!(MeshVertex, [f32; 8]);

/// Axis-aligned bounding metadata for an imported mesh, measured on the
/// model's own coordinates before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    /// Midpoint of the axis-aligned bounding box (pre-normalization).
    pub center: Vec3,
    /// Uniform factor that maps the model into a unit cube.
    pub scale: f32,
    /// Half the model's height after normalization.
    pub half_height: f32,
    /// Half-extents per axis after normalization.
    pub half_extents: Vec3,
}

impl MeshBounds {
    /// Derive bounds from an axis-aligned min/max box.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let extent = max - min;
        let largest = extent.x.max(extent.y).max(extent.z);
        let scale = if largest > f32::EPSILON {
            1.0 / largest
        } else {
            1.0
        };
        let half_extents = extent * 0.5 * scale;
        Self {
            center: (min + max) * 0.5,
            scale,
            half_height: half_extents.y,
            half_extents,
        }
    }
}

/// A triangle list ready for upload, with its bounding metadata.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Non-indexed triangle list. Length is a multiple of 3.
    pub vertices: Vec<MeshVertex>,
    pub bounds: MeshBounds,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_symmetric_box() {
        let bounds = MeshBounds::from_min_max(Vec3::splat(-2.0), Vec3::splat(2.0));
        assert_eq!(bounds.center, Vec3::ZERO);
        assert!((bounds.scale - 0.25).abs() < 1e-6);
        assert!((bounds.half_height - 0.5).abs() < 1e-6);
        assert_eq!(bounds.half_extents, Vec3::splat(0.5));
    }

    #[test]
    fn bounds_of_offset_flat_box() {
        // A 4 x 1 x 2 box sitting away from the origin.
        let bounds = MeshBounds::from_min_max(Vec3::new(1.0, 0.0, 1.0), Vec3::new(5.0, 1.0, 3.0));
        assert_eq!(bounds.center, Vec3::new(3.0, 0.5, 2.0));
        assert!((bounds.scale - 0.25).abs() < 1e-6);
        assert!((bounds.half_height - 0.125).abs() < 1e-6);
        assert_eq!(bounds.half_extents, Vec3::new(0.5, 0.125, 0.25));
    }

    #[test]
    fn degenerate_bounds_do_not_divide_by_zero() {
        let bounds = MeshBounds::from_min_max(Vec3::ONE, Vec3::ONE);
        assert_eq!(bounds.scale, 1.0);
        assert_eq!(bounds.half_extents, Vec3::ZERO);
    }
}
