//! Wavefront OBJ importer.
//!
//! Minimal subset: `v`, `vt`, `vn`, and `f` records with `v`, `v/vt`,
//! `v//vn`, or `v/vt/vn` corners. Polygons are fan-triangulated. Malformed
//! records are skipped with a warning rather than failing the whole file,
//! since hand-edited OBJ exports are often slightly off.
//!
//! Imported models are normalized: recentered on their bounding-box midpoint
//! and uniformly scaled so the largest extent becomes 1. The scene composer
//! applies world scale on top.

use std::path::Path;

use glam::{Vec2, Vec3};
use thiserror::Error;

use super::{MeshBounds, MeshData, MeshVertex};

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} contains no usable triangles")]
    NoGeometry { path: String },
}

/// One corner of a face: indices into the position/uv/normal pools.
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Load and normalize an OBJ model.
pub fn load_obj(path: &Path) -> Result<MeshData, MeshError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: display.clone(),
        source,
    })?;

    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();
    // Position index per emitted vertex that still needs a synthesized
    // normal, and the per-position face-normal accumulator feeding them.
    let mut pending_normals: Vec<Option<usize>> = Vec::new();
    let mut normal_accum: Vec<Vec3> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => match parse_vec3(tokens) {
                Some(v) => positions.push(v),
                None => log::warn!("{display}:{}: skipping malformed v record", line_no + 1),
            },
            Some("vt") => match parse_vec2(tokens) {
                Some(v) => uvs.push(v),
                None => log::warn!("{display}:{}: skipping malformed vt record", line_no + 1),
            },
            Some("vn") => match parse_vec3(tokens) {
                Some(v) => normals.push(v),
                None => log::warn!("{display}:{}: skipping malformed vn record", line_no + 1),
            },
            Some("f") => {
                let raw: Vec<&str> = tokens.collect();
                let corners: Vec<Corner> = raw
                    .iter()
                    .filter_map(|t| parse_corner(t, positions.len()))
                    .collect();
                // Any bad corner token invalidates the whole face.
                if corners.len() != raw.len() || corners.len() < 3 {
                    log::warn!("{display}:{}: skipping malformed face", line_no + 1);
                    continue;
                }
                // Fan triangulation around the first corner.
                for i in 1..corners.len() - 1 {
                    emit_triangle(
                        &mut vertices,
                        &mut pending_normals,
                        &mut normal_accum,
                        [corners[0], corners[i], corners[i + 1]],
                        &positions,
                        &uvs,
                        &normals,
                    );
                }
            }
            // Groups, materials, smoothing: ignored.
            _ => {}
        }
    }

    if vertices.is_empty() {
        return Err(MeshError::NoGeometry { path: display });
    }

    // Smooth normals for corners that had none in the file.
    for (vertex, pending) in vertices.iter_mut().zip(&pending_normals) {
        if let Some(position_index) = pending {
            let accumulated = normal_accum
                .get(*position_index)
                .copied()
                .unwrap_or(Vec3::ZERO);
            vertex.normal = accumulated.normalize_or(Vec3::Y).to_array();
        }
    }

    let (min, max) = vertices.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(min, max), v| {
            let p = Vec3::from(v.position);
            (min.min(p), max.max(p))
        },
    );
    let bounds = MeshBounds::from_min_max(min, max);

    for v in &mut vertices {
        let p = (Vec3::from(v.position) - bounds.center) * bounds.scale;
        v.position = p.to_array();
    }

    log::info!(
        "loaded {display}: {} triangles, scale {:.4}",
        vertices.len() / 3,
        bounds.scale
    );
    Ok(MeshData { vertices, bounds })
}

/// Try each candidate path in order; None when all fail.
pub fn load_obj_candidates(candidates: &[String]) -> Option<MeshData> {
    for candidate in candidates {
        match load_obj(Path::new(candidate)) {
            Ok(mesh) => return Some(mesh),
            Err(err) => log::warn!("{err}"),
        }
    }
    None
}

fn parse_vec3<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    let z = tokens.next()?.parse().ok()?;
    Some(Vec3::new(x, y, z))
}

fn parse_vec2<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vec2> {
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    Some(Vec2::new(x, y))
}

/// Parse a face corner (`7`, `7/2`, `7//3`, `7/2/3`). OBJ indices are
/// 1-based; out-of-range or zero indices make the corner invalid.
fn parse_corner(token: &str, position_count: usize) -> Option<Corner> {
    let mut parts = token.split('/');
    let position = parse_index(parts.next()?)?;
    if position >= position_count {
        return None;
    }
    let uv = parts.next().filter(|s| !s.is_empty()).and_then(parse_index);
    let normal = parts.next().filter(|s| !s.is_empty()).and_then(parse_index);
    Some(Corner {
        position,
        uv,
        normal,
    })
}

fn parse_index(token: &str) -> Option<usize> {
    let value: i64 = token.parse().ok()?;
    if value < 1 {
        return None;
    }
    Some((value - 1) as usize)
}

fn emit_triangle(
    vertices: &mut Vec<MeshVertex>,
    pending_normals: &mut Vec<Option<usize>>,
    normal_accum: &mut Vec<Vec3>,
    corners: [Corner; 3],
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
) {
    let p = [
        positions[corners[0].position],
        positions[corners[1].position],
        positions[corners[2].position],
    ];
    let face_normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero();
    for (i, corner) in corners.iter().enumerate() {
        let explicit = corner.normal.and_then(|n| normals.get(n).copied());
        if explicit.is_none() {
            if normal_accum.len() <= corner.position {
                normal_accum.resize(corner.position + 1, Vec3::ZERO);
            }
            normal_accum[corner.position] += face_normal;
        }
        pending_normals.push(explicit.is_none().then_some(corner.position));
        let uv = corner
            .uv
            .and_then(|t| uvs.get(t).copied())
            .unwrap_or(Vec2::ZERO);
        vertices.push(MeshVertex {
            position: p[i].to_array(),
            normal: explicit.unwrap_or(face_normal).to_array(),
            uv: uv.to_array(),
        });
    }
}
