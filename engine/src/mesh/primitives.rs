//! Procedural fallback primitives.
//!
//! Everything in the cabinet except the toys is drawn from these two meshes,
//! stretched by per-draw transforms. Both are normalized the same way the
//! OBJ importer normalizes imports: centered on the origin, largest extent 1.

use glam::Vec3;

use super::{MeshBounds, MeshData, MeshVertex};

/// A unit cube spanning [-0.5, 0.5] on every axis, as a 36-vertex triangle
/// list with per-face normals and UVs.
pub fn unit_cube() -> MeshData {
    const FACE_NORMALS: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    let mut vertices = Vec::with_capacity(36);
    for normal in FACE_NORMALS {
        let n = Vec3::from(normal);
        // Build an orthogonal basis in the face plane.
        let tangent = if n.y.abs() > 0.5 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::Y.cross(n).normalize()
        };
        let bitangent = n.cross(tangent);
        let center = n * 0.5;
        let corners = [
            center - tangent * 0.5 - bitangent * 0.5,
            center + tangent * 0.5 - bitangent * 0.5,
            center + tangent * 0.5 + bitangent * 0.5,
            center - tangent * 0.5 + bitangent * 0.5,
        ];
        let corner_uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for &(a, b, c) in &[(0usize, 1usize, 2usize), (0, 2, 3)] {
            for &i in &[a, b, c] {
                vertices.push(MeshVertex {
                    position: corners[i].to_array(),
                    normal: n.to_array(),
                    uv: corner_uvs[i],
                });
            }
        }
    }

    MeshData {
        vertices,
        bounds: MeshBounds::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5)),
    }
}

/// A UV sphere of diameter 1, triangulated at the given resolution.
pub fn uv_sphere(stacks: u32, slices: u32) -> MeshData {
    let stacks = stacks.max(3);
    let slices = slices.max(3);
    let mut vertices = Vec::with_capacity((stacks * slices * 6) as usize);

    let point = |stack: u32, slice: u32| -> (Vec3, [f32; 2]) {
        let v = stack as f32 / stacks as f32;
        let u = slice as f32 / slices as f32;
        let phi = v * std::f32::consts::PI;
        let theta = u * std::f32::consts::TAU;
        let dir = Vec3::new(
            phi.sin() * theta.cos(),
            phi.cos(),
            phi.sin() * theta.sin(),
        );
        (dir * 0.5, [u, v])
    };

    for stack in 0..stacks {
        for slice in 0..slices {
            let (p00, t00) = point(stack, slice);
            let (p01, t01) = point(stack, slice + 1);
            let (p10, t10) = point(stack + 1, slice);
            let (p11, t11) = point(stack + 1, slice + 1);
            // Two triangles per quad; polar quads degenerate harmlessly.
            for (p, t) in [(p00, t00), (p10, t10), (p11, t11), (p00, t00), (p11, t11), (p01, t01)]
            {
                vertices.push(MeshVertex {
                    position: p.to_array(),
                    // On a unit sphere the normal is the position direction.
                    normal: (p * 2.0).to_array(),
                    uv: t,
                });
            }
        }
    }

    MeshData {
        vertices,
        bounds: MeshBounds::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_36_vertices_within_half_unit() {
        let cube = unit_cube();
        assert_eq!(cube.vertices.len(), 36);
        for v in &cube.vertices {
            for c in v.position {
                assert!(c.abs() <= 0.5 + 1e-6);
            }
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn cube_normals_point_away_from_center() {
        let cube = unit_cube();
        for v in &cube.vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_the_surface() {
        let sphere = uv_sphere(24, 24);
        assert_eq!(sphere.vertices.len() as u32, 24 * 24 * 6);
        for v in &sphere.vertices {
            let r = Vec3::from(v.position).length();
            assert!((r - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_resolution_has_a_floor() {
        let sphere = uv_sphere(1, 1);
        assert_eq!(sphere.vertices.len() as u32, 3 * 3 * 6);
    }

    #[test]
    fn primitive_bounds_match_a_unit_box() {
        let cube = unit_cube();
        assert_eq!(cube.bounds.half_height, 0.5);
        assert_eq!(cube.bounds.scale, 1.0);
        assert_eq!(cube.bounds.center, Vec3::ZERO);
    }
}
