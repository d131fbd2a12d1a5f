//! Simulation State
//!
//! Central state struct for the claw machine simulation. All of it is owned
//! by the frame-loop driver and mutated in place by [`super::tick`]; there
//! are no ambient globals.

use glam::Vec3;

use super::consts::{CLAW_REST_Y, DEFAULT_HALF_EXTENT, DEFAULT_HALF_HEIGHT};

/// Current phase of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Machine idle; a front-facing click inserts a coin and starts play.
    WaitingForCoin,
    /// Claw is under player control.
    Playing,
}

/// Exclusive vertical motion mode of the claw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClawMotion {
    /// At rest height, steerable.
    #[default]
    Idle,
    /// Travelling down toward the capture height.
    Descending,
    /// Travelling back up toward the rest height.
    Ascending,
}

/// One prize in the machine. The set is fixed at startup; toys are never
/// destroyed, only marked taken.
#[derive(Debug, Clone)]
pub struct Toy {
    /// World position. Mutated every tick while caught or falling.
    pub position: Vec3,
    /// Tint color, fixed at creation.
    pub color: Vec3,
    /// Held by the claw. At most one toy is caught at any time.
    pub caught: bool,
    /// Landed on the chute floor, awaiting collection.
    pub dropped: bool,
    /// Collected by the player. Terminal: excluded from physics and rendering.
    pub taken: bool,
    /// In free fall after release.
    pub falling: bool,
    /// Vertical velocity; nonzero only while falling.
    pub vertical_velocity: f32,
    /// Bounding half-height of the toy's render mesh (post-normalization).
    pub half_height: f32,
    /// Bounding half-extents of the toy's render mesh.
    pub half_extents: Vec3,
}

impl Toy {
    /// Create a toy resting on the prize table with fallback bounds.
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            caught: false,
            dropped: false,
            taken: false,
            falling: false,
            vertical_velocity: 0.0,
            half_height: DEFAULT_HALF_HEIGHT,
            half_extents: Vec3::splat(DEFAULT_HALF_EXTENT),
        }
    }

    /// Attach bounding metadata from an imported mesh.
    pub fn set_bounds(&mut self, half_height: f32, half_extents: Vec3) {
        self.half_height = half_height;
        self.half_extents = half_extents;
    }
}

/// The player-controlled gripper. Kinematic: moved by fixed per-tick steps,
/// no forces.
#[derive(Debug, Clone)]
pub struct Claw {
    /// Horizontal position, clamped to the steering range.
    pub x: f32,
    /// Horizontal position, clamped to the steering range.
    pub z: f32,
    /// Vertical position.
    pub y: f32,
    /// Whether a toy currently hangs from the claw.
    pub holding: bool,
    /// Vertical motion mode.
    pub motion: ClawMotion,
}

impl Default for Claw {
    fn default() -> Self {
        Self {
            x: 0.0,
            z: 0.0,
            y: CLAW_REST_Y,
            holding: false,
            motion: ClawMotion::Idle,
        }
    }
}

/// Previous-tick held state for rising-edge detection. One bit per tracked
/// action, same lifetime as the simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTracker {
    /// Grab/drop action (space) was held last tick.
    pub grab_was_held: bool,
    /// Coin/collect action (click) was held last tick.
    pub coin_was_held: bool,
}

/// Joystick visual tilt in degrees, derived from this tick's steering input.
/// Reset at the start of every tick before steering reapplies it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoystickTilt {
    /// Tilt around the x axis (forward/back steering).
    pub x_deg: f32,
    /// Tilt around the z axis (left/right steering).
    pub z_deg: f32,
}

/// Complete simulation state.
#[derive(Debug, Clone)]
pub struct SimState {
    /// Current game phase.
    pub phase: GamePhase,
    /// The claw.
    pub claw: Claw,
    /// All prizes, in fixed array order (capture scans respect this order).
    pub toys: Vec<Toy>,
    /// Joystick tilt for this tick.
    pub joystick: JoystickTilt,
    /// Rising-edge memory for the two one-shot actions.
    pub edges: EdgeTracker,
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimState {
    /// Create the starting state: claw at rest, two toys on the table.
    pub fn new() -> Self {
        Self {
            phase: GamePhase::WaitingForCoin,
            claw: Claw::default(),
            toys: vec![
                Toy::new(Vec3::new(0.3, 1.15, -0.4), Vec3::new(0.1, 0.5, 0.8)),
                Toy::new(Vec3::new(-0.3, 1.15, 0.2), Vec3::new(0.9, 0.2, 0.2)),
            ],
            joystick: JoystickTilt::default(),
            edges: EdgeTracker::default(),
        }
    }

    /// True while a dropped, not-yet-collected prize sits in the chute.
    pub fn prize_in_chute(&self) -> bool {
        self.toys.iter().any(|t| t.dropped && !t.taken)
    }

    /// Number of toys currently held by the claw. Invariant: <= 1.
    pub fn caught_count(&self) -> usize {
        self.toys.iter().filter(|t| t.caught).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_waiting_for_coin() {
        let state = SimState::new();
        assert_eq!(state.phase, GamePhase::WaitingForCoin);
        assert_eq!(state.claw.motion, ClawMotion::Idle);
        assert!(!state.claw.holding);
        assert_eq!(state.claw.y, CLAW_REST_Y);
    }

    #[test]
    fn starting_toys_rest_on_table() {
        let state = SimState::new();
        assert_eq!(state.toys.len(), 2);
        for toy in &state.toys {
            assert_eq!(toy.position.y, 1.15);
            assert!(!toy.caught && !toy.dropped && !toy.taken && !toy.falling);
            assert_eq!(toy.vertical_velocity, 0.0);
        }
        assert_eq!(state.caught_count(), 0);
        assert!(!state.prize_in_chute());
    }

    #[test]
    fn toy_bounds_default_to_fallback_primitive() {
        let toy = Toy::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(toy.half_height, 0.25);
        assert_eq!(toy.half_extents, Vec3::splat(0.25));
    }
}
