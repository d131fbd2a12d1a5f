//! Input Handler
//!
//! Centralized input handling for the claw machine.
//! Maps physical input events to game actions.

use std::collections::HashMap;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Input actions that can be triggered by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    // Claw steering
    ClawNorth,
    ClawSouth,
    ClawWest,
    ClawEast,

    // Drop the claw / release a held toy
    Grab,

    // Camera orbit
    OrbitLeft,
    OrbitRight,

    // System
    Escape,
}

/// State of a key (pressed or released)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

/// Current input state
pub struct InputState {
    /// Key states mapped by KeyCode
    keys: HashMap<KeyCode, KeyState>,
    /// Action states mapped by GameAction
    actions: HashMap<GameAction, KeyState>,
    /// Key-to-action bindings
    bindings: HashMap<KeyCode, Vec<GameAction>>,
    /// Mouse button states
    left_mouse: KeyState,
    right_mouse: KeyState,
    /// Mouse movement delta since last frame
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        let mut state = Self {
            keys: HashMap::new(),
            actions: HashMap::new(),
            bindings: HashMap::new(),
            left_mouse: KeyState::default(),
            right_mouse: KeyState::default(),
            mouse_delta: (0.0, 0.0),
        };
        state.setup_default_bindings();
        state
    }

    /// Setup default key bindings
    fn setup_default_bindings(&mut self) {
        // Claw steering (WASD)
        self.bind(KeyCode::KeyW, GameAction::ClawNorth);
        self.bind(KeyCode::KeyS, GameAction::ClawSouth);
        self.bind(KeyCode::KeyA, GameAction::ClawWest);
        self.bind(KeyCode::KeyD, GameAction::ClawEast);

        // Grab / drop
        self.bind(KeyCode::Space, GameAction::Grab);

        // Camera orbit (arrow keys)
        self.bind(KeyCode::ArrowLeft, GameAction::OrbitLeft);
        self.bind(KeyCode::ArrowRight, GameAction::OrbitRight);

        // System
        self.bind(KeyCode::Escape, GameAction::Escape);
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: GameAction) {
        self.bindings.entry(key).or_default().push(action);
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let state = self.keys.entry(key).or_default();
        state.just_pressed = pressed && !state.pressed;
        state.just_released = !pressed && state.pressed;
        state.pressed = pressed;

        if let Some(actions) = self.bindings.get(&key).cloned() {
            for action in actions {
                let action_state = self.actions.entry(action).or_default();
                action_state.just_pressed = pressed && !action_state.pressed;
                action_state.just_released = !pressed && action_state.pressed;
                action_state.pressed = pressed;
            }
        }
    }

    /// Handle mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let state = match button {
            MouseButton::Left => &mut self.left_mouse,
            MouseButton::Right => &mut self.right_mouse,
            _ => return,
        };
        state.just_pressed = pressed && !state.pressed;
        state.just_released = !pressed && state.pressed;
        state.pressed = pressed;
    }

    /// Handle raw mouse movement (for camera look)
    pub fn handle_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Clear per-frame state (call at end of frame)
    pub fn end_frame(&mut self) {
        for state in self.keys.values_mut() {
            state.just_pressed = false;
            state.just_released = false;
        }
        for state in self.actions.values_mut() {
            state.just_pressed = false;
            state.just_released = false;
        }
        self.left_mouse.just_pressed = false;
        self.left_mouse.just_released = false;
        self.right_mouse.just_pressed = false;
        self.right_mouse.just_released = false;
        self.mouse_delta = (0.0, 0.0);
    }

    // Query methods

    /// Check if a key is currently pressed
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|s| s.pressed)
    }

    /// Check if an action is currently active
    pub fn action_pressed(&self, action: GameAction) -> bool {
        self.actions.get(&action).is_some_and(|s| s.pressed)
    }

    /// Check if an action was just triggered this frame
    pub fn action_just_pressed(&self, action: GameAction) -> bool {
        self.actions.get(&action).is_some_and(|s| s.just_pressed)
    }

    /// Check if left mouse button is pressed
    pub fn left_mouse_pressed(&self) -> bool {
        self.left_mouse.pressed
    }

    /// Get mouse movement delta since last frame
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_sets_bound_action() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyW, true);
        assert!(input.action_pressed(GameAction::ClawNorth));
        assert!(input.action_just_pressed(GameAction::ClawNorth));

        input.end_frame();
        assert!(input.action_pressed(GameAction::ClawNorth));
        assert!(!input.action_just_pressed(GameAction::ClawNorth));

        input.handle_key(KeyCode::KeyW, false);
        assert!(!input.action_pressed(GameAction::ClawNorth));
    }

    #[test]
    fn mouse_delta_accumulates_until_end_of_frame() {
        let mut input = InputState::new();
        input.handle_mouse_delta(2.0, -1.0);
        input.handle_mouse_delta(1.0, 1.0);
        assert_eq!(input.mouse_delta(), (3.0, 0.0));
        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn unbound_mouse_buttons_are_ignored() {
        let mut input = InputState::new();
        input.handle_mouse_button(MouseButton::Middle, true);
        assert!(!input.left_mouse_pressed());
        input.handle_mouse_button(MouseButton::Left, true);
        assert!(input.left_mouse_pressed());
    }
}
