//! Simulation tunables.
//!
//! Every gameplay constant lives here so the tick logic and its tests agree
//! on the numbers.

/// Target tick rate in Hz. Frames arriving before the interval has elapsed
/// are dropped entirely, never queued.
pub const TICK_RATE: f64 = 75.0;
/// Minimum interval between ticks in seconds.
pub const TICK_INTERVAL: f64 = 1.0 / TICK_RATE;

/// Horizontal claw movement per tick while a direction key is held.
pub const CLAW_MOVE_STEP: f32 = 0.05;
/// Symmetric clamp range for claw x and z.
pub const CLAW_RANGE: f32 = 1.7;
/// Vertical claw travel per tick while descending or ascending.
pub const CLAW_LIFT_STEP: f32 = 0.06;
/// Claw resting height (top of travel).
pub const CLAW_REST_Y: f32 = 4.3;
/// Height at which a descent bottoms out and the capture test runs.
pub const CLAW_CAPTURE_Y: f32 = 1.7;
/// Horizontal radius within which a toy can be captured.
pub const CAPTURE_RADIUS: f32 = 0.45;

/// Joystick visual tilt while a direction key is held (degrees).
pub const JOYSTICK_TILT_DEG: f32 = 20.0;

/// Base vertical hang distance between the claw and a caught toy.
pub const HANG_BASE_OFFSET: f32 = 0.35;
/// Fraction of the toy's own half-height added to the hang distance, so
/// differently sized toys hang consistently relative to their geometry.
pub const HANG_HALF_HEIGHT_FACTOR: f32 = 0.6;
/// Per-tick interpolation factor for a caught toy chasing its desired
/// position. The lag is intentional; do not snap.
pub const FOLLOW_LERP: f32 = 0.35;

/// Half-width of the glass enclosure.
pub const GLASS_HALF_EXTENT: f32 = 1.95;
/// Extra inset so a hanging toy never visually touches the glass.
pub const GLASS_INSET: f32 = 0.06;
/// Upper vertical clamp for a caught toy, before the half-height inset.
pub const HANG_TOP_LIMIT: f32 = 6.8;
/// Lower vertical clamp for a caught toy, before the half-height inset.
pub const HANG_BOTTOM_LIMIT: f32 = 0.36;

/// Downward acceleration per tick for a falling toy.
pub const FALL_GRAVITY: f32 = 0.015;
/// Floor height on the prize table.
pub const TABLE_FLOOR_Y: f32 = 1.15;
/// Floor height inside the chute. Landing here marks the toy dropped.
pub const CHUTE_FLOOR_Y: f32 = 0.35;
/// Chute zone: x below this bound...
pub const CHUTE_MAX_X: f32 = -0.8;
/// ...and z above this bound.
pub const CHUTE_MIN_Z: f32 = 0.5;

/// Cosine threshold on the camera orbit angle for "facing the front".
pub const FACING_FRONT_COS: f32 = 0.7;

/// Fallback bounding half-height for a toy without an imported mesh.
pub const DEFAULT_HALF_HEIGHT: f32 = 0.25;
/// Fallback bounding half-extent (per axis) for a toy without an imported mesh.
pub const DEFAULT_HALF_EXTENT: f32 = 0.25;
