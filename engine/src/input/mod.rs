//! Input System
//!
//! Window-event handling and the per-tick snapshot the simulation consumes.

pub mod handler;
pub mod snapshot;

pub use handler::{GameAction, InputState, KeyState};
pub use snapshot::InputSnapshot;
