//! Per-tick input snapshot.
//!
//! The simulation never touches winit types; the frame-loop driver samples
//! [`super::InputState`] into this plain struct once per tick.

use super::{GameAction, InputState};

/// Held-state of every action the simulation cares about, sampled at the
/// start of a tick. All fields are level-triggered; edge detection happens
/// inside the simulation so it stays deterministic under frame drops.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Steer the claw toward negative z.
    pub move_north: bool,
    /// Steer the claw toward positive z.
    pub move_south: bool,
    /// Steer the claw toward negative x.
    pub move_west: bool,
    /// Steer the claw toward positive x.
    pub move_east: bool,
    /// Grab / drop button held.
    pub grab: bool,
    /// Coin / collect button held (left mouse).
    pub coin: bool,
    /// Orbit the camera counter-clockwise.
    pub orbit_left: bool,
    /// Orbit the camera clockwise.
    pub orbit_right: bool,
}

impl InputSnapshot {
    /// Sample the current held state of all bound actions.
    pub fn capture(input: &InputState) -> Self {
        Self {
            move_north: input.action_pressed(GameAction::ClawNorth),
            move_south: input.action_pressed(GameAction::ClawSouth),
            move_west: input.action_pressed(GameAction::ClawWest),
            move_east: input.action_pressed(GameAction::ClawEast),
            grab: input.action_pressed(GameAction::Grab),
            coin: input.left_mouse_pressed(),
            orbit_left: input.action_pressed(GameAction::OrbitLeft),
            orbit_right: input.action_pressed(GameAction::OrbitRight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::MouseButton;
    use winit::keyboard::KeyCode;

    #[test]
    fn capture_reflects_held_keys() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyW, true);
        input.handle_key(KeyCode::Space, true);
        input.handle_mouse_button(MouseButton::Left, true);

        let snap = InputSnapshot::capture(&input);
        assert!(snap.move_north && snap.grab && snap.coin);
        assert!(!snap.move_south && !snap.move_west && !snap.move_east);
        assert!(!snap.orbit_left && !snap.orbit_right);
    }

    #[test]
    fn capture_is_level_triggered() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::Space, true);
        input.end_frame();

        // Still held after the frame boundary, so still reported.
        let snap = InputSnapshot::capture(&input);
        assert!(snap.grab);
    }
}
