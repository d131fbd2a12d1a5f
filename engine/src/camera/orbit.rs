//! Orbit Camera Module
//!
//! The machine sits at the world origin and the camera circles it on a fixed
//! ring: radius 10, height 5. Arrow keys step the orbit angle; the mouse can
//! additionally look around freely from the current eye position.
//!
//! Key features:
//! - Fixed-step orbit (0.03 rad per tick while a key is held)
//! - Direct mouse look, 0.002 rad/pixel, no smoothing
//! - Pitch clamped to ±89 degrees to prevent gimbal lock
//! - Front detection for the coin slot (cos(angle) > 0.7)

use glam::{Mat4, Vec3};

use crate::sim::consts::FACING_FRONT_COS;

/// Orbit angle change per tick while an orbit key is held (radians).
pub const ORBIT_STEP: f32 = 0.03;
/// Distance from the world origin to the camera eye, in the XZ plane.
pub const ORBIT_RADIUS: f32 = 10.0;
/// Fixed eye height.
pub const ORBIT_HEIGHT: f32 = 5.0;
/// Point the camera re-aims at after orbiting (mid-height of the cabinet).
const LOOK_TARGET: Vec3 = Vec3::new(0.0, 3.0, 0.0);

/// Pitch limit constant: -89 degrees in radians
const PITCH_LIMIT_MIN: f32 = -89.0 * std::f32::consts::PI / 180.0;
/// Pitch limit constant: +89 degrees in radians
const PITCH_LIMIT_MAX: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Orbit camera state
///
/// Window-system agnostic: orbit input and mouse deltas are pushed in by the
/// frame loop, matrices are pulled out by the renderer.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Orbit angle around the machine (radians). 0 = directly in front.
    pub angle: f32,
    /// Free-look horizontal angle (radians), re-aimed at the cabinet after
    /// each orbit step.
    pub yaw: f32,
    /// Free-look vertical angle (radians), clamped to ±89 degrees.
    pub pitch: f32,
    /// Mouse sensitivity in radians per pixel (default: 0.002)
    pub sensitivity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let mut camera = Self {
            angle: 0.0,
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            sensitivity: 0.002,
        };
        camera.aim_at_cabinet();
        camera
    }
}

impl OrbitCamera {
    /// Create a camera at the front of the machine, aimed at the cabinet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Eye position in world space, derived from the orbit angle.
    #[inline]
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.angle.sin() * ORBIT_RADIUS,
            ORBIT_HEIGHT,
            self.angle.cos() * ORBIT_RADIUS,
        )
    }

    /// Step the orbit by one tick of held input. Positive = counter-clockwise
    /// when seen from above. Re-aims the view at the cabinet.
    pub fn orbit(&mut self, left: bool, right: bool) {
        if left == right {
            return;
        }
        if left {
            self.angle += ORBIT_STEP;
        } else {
            self.angle -= ORBIT_STEP;
        }
        self.aim_at_cabinet();
    }

    /// Apply mouse movement delta for free look from the current eye.
    ///
    /// Positive dx = look right (increase yaw); positive dy = look down.
    /// Pitch is clamped to ±89 degrees.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(PITCH_LIMIT_MIN, PITCH_LIMIT_MAX);
    }

    /// The normalized view direction derived from yaw and pitch.
    ///
    /// Convention: yaw = -π/2 with pitch = 0 looks toward -Z.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// True while the camera is near the front of the machine, where the
    /// coin slot and collection chute are reachable.
    #[inline]
    pub fn facing_front(&self) -> bool {
        self.angle.cos() > FACING_FRONT_COS
    }

    /// Right-handed view matrix for the current eye and view direction.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.eye();
        Mat4::look_at_rh(eye, eye + self.forward(), Vec3::Y)
    }

    /// Perspective projection for the given surface aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0)
    }

    /// Re-point yaw and pitch at the cabinet mid-height from the current eye.
    fn aim_at_cabinet(&mut self) {
        let to_target = LOOK_TARGET - self.eye();
        let distance = to_target.length();
        if distance > 0.001 {
            self.yaw = to_target.z.atan2(to_target.x);
            self.pitch = (to_target.y / distance)
                .asin()
                .clamp(PITCH_LIMIT_MIN, PITCH_LIMIT_MAX);
        }
    }
}
