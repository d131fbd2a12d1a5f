//! Scene composer.
//!
//! Rebuilds the draw list from scratch every frame. Commands are grouped
//! into three phases whose order is load-bearing: opaque geometry first,
//! then the glass panels (blended, no depth write), then screen-space
//! overlays (no depth test at all).

use glam::{Mat4, Vec3};

use crate::sim::consts::{CHUTE_MAX_X, CHUTE_MIN_Z, GLASS_HALF_EXTENT};
use crate::sim::{ClawMotion, GamePhase, SimState, Toy};

/// Which mesh a draw command references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshId {
    Cube,
    Sphere,
    /// Imported model for the toy at this index.
    Toy(usize),
}

/// One draw, fully resolved on the CPU.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub mesh: MeshId,
    pub vertex_count: u32,
    pub transform: Mat4,
    pub color: Vec3,
    pub alpha: f32,
    pub use_texture: bool,
}

/// The frame's draws in fixed phase order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub opaque: Vec<DrawCommand>,
    pub glass: Vec<DrawCommand>,
    pub overlay: Vec<DrawCommand>,
}

impl DrawList {
    pub fn len(&self) -> usize {
        self.opaque.len() + self.glass.len() + self.overlay.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vertex counts for the meshes the composer can reference. The toy entries
/// run parallel to `SimState::toys`; `None` means no model was imported and
/// the fallback cube is used.
#[derive(Debug, Clone)]
pub struct MeshCatalog {
    pub cube_vertex_count: u32,
    pub sphere_vertex_count: u32,
    pub toy_vertex_counts: Vec<Option<u32>>,
}

impl MeshCatalog {
    fn cube(&self) -> (MeshId, u32) {
        (MeshId::Cube, self.cube_vertex_count)
    }

    fn sphere(&self) -> (MeshId, u32) {
        (MeshId::Sphere, self.sphere_vertex_count)
    }

    fn toy(&self, index: usize) -> Option<(MeshId, u32)> {
        self.toy_vertex_counts
            .get(index)
            .copied()
            .flatten()
            .map(|count| (MeshId::Toy(index), count))
    }
}

// Lamp palette.
const LAMP_GREEN: Vec3 = Vec3::new(0.1, 0.9, 0.2);
const LAMP_RED: Vec3 = Vec3::new(0.9, 0.1, 0.1);
const LAMP_BLUE: Vec3 = Vec3::new(0.15, 0.3, 0.95);
const LAMP_OFF: Vec3 = Vec3::new(0.2, 0.2, 0.22);
/// Lamp blink frequency while a prize waits in the chute (Hz).
const LAMP_BLINK_HZ: f64 = 4.0;

/// Claw finger spread from vertical: nearly closed while gripping or
/// descending, wide open otherwise.
const FINGER_CLOSED_DEG: f32 = 15.0;
const FINGER_OPEN_DEG: f32 = 45.0;

/// Rope anchor height under the cabinet ceiling.
const ROPE_ANCHOR_Y: f32 = 5.0;

/// World scale of the fallback cube standing in for a missing toy model.
const TOY_FALLBACK_SCALE: Vec3 = Vec3::new(0.5, 0.4, 0.5);

/// Signal lamp color for this instant.
pub fn lamp_color(state: &SimState, time_seconds: f64) -> Vec3 {
    if state.prize_in_chute() {
        // Square wave between green and red.
        if ((time_seconds * LAMP_BLINK_HZ).floor() as i64) % 2 == 0 {
            LAMP_GREEN
        } else {
            LAMP_RED
        }
    } else if state.phase == GamePhase::Playing {
        LAMP_BLUE
    } else {
        LAMP_OFF
    }
}

/// Finger spread angle in degrees for the current claw state.
pub fn finger_open_angle_deg(state: &SimState) -> f32 {
    if state.claw.holding || state.claw.motion == ClawMotion::Descending {
        FINGER_CLOSED_DEG
    } else {
        FINGER_OPEN_DEG
    }
}

/// Compose the full frame.
pub fn compose(state: &SimState, catalog: &MeshCatalog, time_seconds: f64) -> DrawList {
    let mut list = DrawList::default();

    push_room(&mut list, catalog);
    push_cabinet(&mut list, catalog);
    push_lamp(&mut list, catalog, state, time_seconds);
    push_controls(&mut list, catalog, state);
    push_claw(&mut list, catalog, state);
    push_toys(&mut list, catalog, state);
    push_glass(&mut list, catalog);
    push_signature(&mut list, catalog);

    list
}

fn solid(
    (mesh, vertex_count): (MeshId, u32),
    transform: Mat4,
    color: Vec3,
) -> DrawCommand {
    DrawCommand {
        mesh,
        vertex_count,
        transform,
        color,
        alpha: 1.0,
        use_texture: false,
    }
}

fn box_at(center: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(center) * Mat4::from_scale(scale)
}

fn push_room(list: &mut DrawList, catalog: &MeshCatalog) {
    let cube = catalog.cube();
    // Floor, roof, and four walls of the arcade room.
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(0.0, -0.05, 0.0), Vec3::new(30.0, 0.1, 30.0)),
        Vec3::new(0.35, 0.3, 0.32),
    ));
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(0.0, 10.05, 0.0), Vec3::new(30.0, 0.1, 30.0)),
        Vec3::new(0.25, 0.25, 0.3),
    ));
    let wall_color = Vec3::new(0.45, 0.42, 0.5);
    for (center, scale) in [
        (Vec3::new(0.0, 5.0, -15.0), Vec3::new(30.0, 10.0, 0.1)),
        (Vec3::new(0.0, 5.0, 15.0), Vec3::new(30.0, 10.0, 0.1)),
        (Vec3::new(-15.0, 5.0, 0.0), Vec3::new(0.1, 10.0, 30.0)),
        (Vec3::new(15.0, 5.0, 0.0), Vec3::new(0.1, 10.0, 30.0)),
    ] {
        list.opaque.push(solid(cube, box_at(center, scale), wall_color));
    }
}

fn push_cabinet(list: &mut DrawList, catalog: &MeshCatalog) {
    let cube = catalog.cube();
    let body = Vec3::new(0.65, 0.12, 0.2);

    // Base body up to the prize table.
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(0.0, 0.55, 0.0), Vec3::new(4.4, 1.1, 4.4)),
        body,
    ));
    // Prize table surface (toys rest at y = 1.15).
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(0.0, 1.125, 0.0), Vec3::new(4.0, 0.05, 4.0)),
        Vec3::new(0.85, 0.75, 0.55),
    ));
    // Top box carrying the claw gantry.
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(0.0, 5.2, 0.0), Vec3::new(4.4, 0.6, 4.4)),
        body,
    ));
    // Corner pillars between table and top box.
    let pillar = Vec3::new(0.12, 4.1, 0.12);
    for (x, z) in [(-2.14, -2.14), (-2.14, 2.14), (2.14, -2.14), (2.14, 2.14)] {
        list.opaque.push(solid(
            cube,
            box_at(Vec3::new(x, 3.0, z), pillar),
            Vec3::new(0.5, 0.1, 0.15),
        ));
    }

    // Chute: a sunken floor in the front-left corner, with rim walls along
    // the zone boundary so the hole reads as a hole.
    let chute_center_x = (-GLASS_HALF_EXTENT + CHUTE_MAX_X) * 0.5;
    let chute_center_z = (CHUTE_MIN_Z + GLASS_HALF_EXTENT) * 0.5;
    list.opaque.push(solid(
        cube,
        box_at(
            Vec3::new(chute_center_x, 0.33, chute_center_z),
            Vec3::new(GLASS_HALF_EXTENT + CHUTE_MAX_X, 0.04, GLASS_HALF_EXTENT - CHUTE_MIN_Z),
        ),
        Vec3::new(0.15, 0.15, 0.18),
    ));
    let rim = Vec3::new(0.3, 0.25, 0.35);
    list.opaque.push(solid(
        cube,
        box_at(
            Vec3::new(CHUTE_MAX_X, 0.75, chute_center_z),
            Vec3::new(0.06, 0.8, GLASS_HALF_EXTENT - CHUTE_MIN_Z),
        ),
        rim,
    ));
    list.opaque.push(solid(
        cube,
        box_at(
            Vec3::new(chute_center_x, 0.75, CHUTE_MIN_Z),
            Vec3::new(GLASS_HALF_EXTENT + CHUTE_MAX_X, 0.8, 0.06),
        ),
        rim,
    ));
}

fn push_lamp(list: &mut DrawList, catalog: &MeshCatalog, state: &SimState, time_seconds: f64) {
    let sphere = catalog.sphere();
    // Stem and bulb on top of the cabinet.
    list.opaque.push(solid(
        catalog.cube(),
        box_at(Vec3::new(0.0, 5.65, 0.0), Vec3::new(0.08, 0.3, 0.08)),
        Vec3::new(0.2, 0.2, 0.2),
    ));
    list.opaque.push(solid(
        sphere,
        box_at(Vec3::new(0.0, 5.95, 0.0), Vec3::splat(0.4)),
        lamp_color(state, time_seconds),
    ));
}

fn push_controls(list: &mut DrawList, catalog: &MeshCatalog, state: &SimState) {
    let cube = catalog.cube();
    let sphere = catalog.sphere();

    // Control panel protruding from the front face.
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(0.0, 0.95, 2.45), Vec3::new(4.4, 0.3, 0.5)),
        Vec3::new(0.55, 0.1, 0.18),
    ));

    // Joystick: static mount, tilting rod, ball knob. The rod pivots at the
    // mount top so the knob swings with the tilt.
    let pivot = Vec3::new(0.6, 1.12, 2.45);
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(0.6, 1.11, 2.45), Vec3::new(0.3, 0.06, 0.3)),
        Vec3::new(0.15, 0.15, 0.15),
    ));
    let tilt = Mat4::from_rotation_x(state.joystick.x_deg.to_radians())
        * Mat4::from_rotation_z(state.joystick.z_deg.to_radians());
    let rod_local = Mat4::from_translation(Vec3::new(0.0, 0.14, 0.0))
        * Mat4::from_scale(Vec3::new(0.05, 0.28, 0.05));
    let rod = Mat4::from_translation(pivot) * tilt * rod_local;
    list.opaque.push(solid(cube, rod, Vec3::new(0.7, 0.7, 0.72)));
    let knob = Mat4::from_translation(pivot)
        * tilt
        * Mat4::from_translation(Vec3::new(0.0, 0.3, 0.0))
        * Mat4::from_scale(Vec3::splat(0.12));
    list.opaque.push(solid(sphere, knob, Vec3::new(0.9, 0.15, 0.15)));

    // Coin slot.
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(-0.6, 1.13, 2.45), Vec3::new(0.14, 0.06, 0.14)),
        Vec3::new(0.1, 0.1, 0.1),
    ));
    list.opaque.push(solid(
        cube,
        box_at(Vec3::new(-0.6, 1.17, 2.45), Vec3::new(0.02, 0.06, 0.08)),
        Vec3::new(0.95, 0.85, 0.3),
    ));
}

fn push_claw(list: &mut DrawList, catalog: &MeshCatalog, state: &SimState) {
    let cube = catalog.cube();
    let claw = &state.claw;

    // Suspension rope from the gantry anchor down to the head.
    let rope_length = (ROPE_ANCHOR_Y - claw.y).max(0.0);
    list.opaque.push(solid(
        cube,
        box_at(
            Vec3::new(claw.x, (ROPE_ANCHOR_Y + claw.y) * 0.5, claw.z),
            Vec3::new(0.04, rope_length, 0.04),
        ),
        Vec3::new(0.25, 0.25, 0.25),
    ));

    // Head.
    let head = Vec3::new(claw.x, claw.y, claw.z);
    list.opaque.push(solid(
        cube,
        box_at(head, Vec3::splat(0.3)),
        Vec3::new(0.75, 0.75, 0.78),
    ));

    // Four radial fingers, spread by the open angle.
    let spread = finger_open_angle_deg(state).to_radians();
    for k in 0..4 {
        let around = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2 * k as f32);
        let finger = Mat4::from_translation(head)
            * around
            * Mat4::from_translation(Vec3::new(0.12, -0.05, 0.0))
            * Mat4::from_rotation_z(-spread)
            * Mat4::from_translation(Vec3::new(0.0, -0.2, 0.0))
            * Mat4::from_scale(Vec3::new(0.05, 0.4, 0.05));
        list.opaque
            .push(solid(cube, finger, Vec3::new(0.6, 0.6, 0.65)));
    }
}

fn push_toys(list: &mut DrawList, catalog: &MeshCatalog, state: &SimState) {
    for (index, toy) in state.toys.iter().enumerate() {
        if toy.taken {
            continue;
        }
        list.opaque.push(toy_command(catalog, index, toy));
    }
}

/// Draw command for one toy: imported model at unit scale when available,
/// otherwise the fallback cube. Raised so the mesh sits flush on whatever
/// surface the toy's position marks.
fn toy_command(catalog: &MeshCatalog, index: usize, toy: &Toy) -> DrawCommand {
    let lift = Vec3::new(0.0, toy.half_height + 0.01, 0.0);
    let translation = Mat4::from_translation(toy.position + lift);
    match catalog.toy(index) {
        Some(mesh) => solid(mesh, translation, toy.color),
        None => solid(
            catalog.cube(),
            translation * Mat4::from_scale(TOY_FALLBACK_SCALE),
            toy.color,
        ),
    }
}

fn push_glass(list: &mut DrawList, catalog: &MeshCatalog) {
    let cube = catalog.cube();
    let color = Vec3::new(0.7, 0.85, 1.0);
    let mid_y = (1.15 + 4.9) * 0.5;
    let height = 4.9 - 1.15;
    for (center, scale) in [
        (
            Vec3::new(0.0, mid_y, -GLASS_HALF_EXTENT),
            Vec3::new(GLASS_HALF_EXTENT * 2.0, height, 0.04),
        ),
        (
            Vec3::new(0.0, mid_y, GLASS_HALF_EXTENT),
            Vec3::new(GLASS_HALF_EXTENT * 2.0, height, 0.04),
        ),
        (
            Vec3::new(-GLASS_HALF_EXTENT, mid_y, 0.0),
            Vec3::new(0.04, height, GLASS_HALF_EXTENT * 2.0),
        ),
        (
            Vec3::new(GLASS_HALF_EXTENT, mid_y, 0.0),
            Vec3::new(0.04, height, GLASS_HALF_EXTENT * 2.0),
        ),
    ] {
        let (mesh, vertex_count) = cube;
        list.glass.push(DrawCommand {
            mesh,
            vertex_count,
            transform: box_at(center, scale),
            color,
            alpha: 0.15,
            use_texture: false,
        });
    }
}

/// Textured maker's-mark quad in the corner of the screen. Drawn with
/// identity view/projection, so the transform is in clip space.
fn push_signature(list: &mut DrawList, catalog: &MeshCatalog) {
    let (mesh, vertex_count) = catalog.cube();
    list.overlay.push(DrawCommand {
        mesh,
        vertex_count,
        transform: Mat4::from_translation(Vec3::new(0.65, 0.8, 0.0))
            * Mat4::from_scale(Vec3::new(0.4, 0.2, 1.0)),
        color: Vec3::ONE,
        alpha: 0.8,
        use_texture: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::consts::CLAW_REST_Y;

    fn catalog() -> MeshCatalog {
        MeshCatalog {
            cube_vertex_count: 36,
            sphere_vertex_count: 24 * 24 * 6,
            toy_vertex_counts: vec![None, Some(300)],
        }
    }

    #[test]
    fn lamp_is_off_while_waiting_with_empty_chute() {
        let state = SimState::new();
        assert_eq!(lamp_color(&state, 0.0), LAMP_OFF);
    }

    #[test]
    fn lamp_is_blue_while_playing() {
        let mut state = SimState::new();
        state.phase = GamePhase::Playing;
        assert_eq!(lamp_color(&state, 0.0), LAMP_BLUE);
    }

    #[test]
    fn lamp_blinks_green_red_at_4hz_with_prize_waiting() {
        let mut state = SimState::new();
        state.toys[0].dropped = true;
        assert_eq!(lamp_color(&state, 0.1), LAMP_GREEN);
        assert_eq!(lamp_color(&state, 0.3), LAMP_RED);
        assert_eq!(lamp_color(&state, 0.55), LAMP_GREEN);
        // Blinking wins over the Playing color.
        state.phase = GamePhase::Playing;
        assert_eq!(lamp_color(&state, 0.1), LAMP_GREEN);
    }

    #[test]
    fn fingers_open_when_idle_closed_when_holding_or_descending() {
        let mut state = SimState::new();
        assert_eq!(finger_open_angle_deg(&state), FINGER_OPEN_DEG);
        state.claw.motion = ClawMotion::Descending;
        assert_eq!(finger_open_angle_deg(&state), FINGER_CLOSED_DEG);
        state.claw.motion = ClawMotion::Ascending;
        assert_eq!(finger_open_angle_deg(&state), FINGER_OPEN_DEG);
        state.claw.holding = true;
        assert_eq!(finger_open_angle_deg(&state), FINGER_CLOSED_DEG);
    }

    #[test]
    fn phases_are_populated_in_order() {
        let state = SimState::new();
        let list = compose(&state, &catalog(), 0.0);
        assert!(!list.opaque.is_empty());
        assert_eq!(list.glass.len(), 4);
        assert_eq!(list.overlay.len(), 1);
        assert!(list.glass.iter().all(|c| c.alpha < 1.0));
        assert!(list.overlay[0].use_texture);
        assert!((list.overlay[0].alpha - 0.8).abs() < 1e-6);
    }

    #[test]
    fn taken_toys_are_not_drawn() {
        let mut state = SimState::new();
        let before = compose(&state, &catalog(), 0.0).opaque.len();
        state.toys[0].taken = true;
        let after = compose(&state, &catalog(), 0.0).opaque.len();
        assert_eq!(after, before - 1);
    }

    #[test]
    fn toys_are_lifted_by_half_height_plus_epsilon() {
        let state = SimState::new();
        let toy = &state.toys[0];
        let command = toy_command(&catalog(), 0, toy);
        let y = command.transform.w_axis.y;
        assert!((y - (toy.position.y + toy.half_height + 0.01)).abs() < 1e-6);
    }

    #[test]
    fn toy_without_model_uses_scaled_fallback_cube() {
        let state = SimState::new();
        let command = toy_command(&catalog(), 0, &state.toys[0]);
        assert_eq!(command.mesh, MeshId::Cube);
        assert!((command.transform.x_axis.x - 0.5).abs() < 1e-6);
        assert!((command.transform.y_axis.y - 0.4).abs() < 1e-6);

        let imported = toy_command(&catalog(), 1, &state.toys[1]);
        assert_eq!(imported.mesh, MeshId::Toy(1));
        assert_eq!(imported.vertex_count, 300);
        assert!((imported.transform.x_axis.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rope_length_tracks_claw_height() {
        let mut state = SimState::new();
        state.claw.y = CLAW_REST_Y;
        let list = compose(&state, &catalog(), 0.0);
        // Rope is the tall thin cube centered above the claw head.
        let rope = list
            .opaque
            .iter()
            .find(|c| {
                (c.transform.x_axis.x - 0.04).abs() < 1e-6
                    && (c.transform.z_axis.z - 0.04).abs() < 1e-6
            })
            .expect("rope command");
        assert!((rope.transform.y_axis.y - (ROPE_ANCHOR_Y - CLAW_REST_Y)).abs() < 1e-6);
    }
}
