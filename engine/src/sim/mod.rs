//! Simulation Core
//!
//! The game-state machine, claw kinematics, and toy physics. Everything in
//! here is deterministic and window-system agnostic: one call to [`tick`]
//! advances the machine by exactly one fixed-rate tick.

pub mod consts;
pub mod state;
pub mod tick;

pub use state::{Claw, ClawMotion, EdgeTracker, GamePhase, JoystickTilt, SimState, Toy};
pub use tick::tick;
