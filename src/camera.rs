//! # Camera Implementation
//!
//! View and projection matrices for the viewer. These play the part of the
//! scene/camera collaborator that supplies `view` and `projection` to the
//! geometry transform stage once per draw call.
//!
//! ## Key Components
//! - `OrbitCamera`: looks at a fixed target from a yaw/pitch/distance orbit
//! - `Projection`: perspective projection remapped to wgpu's depth range
//! - `OrbitController`: accumulates key input and applies it to the camera

use std::f32::consts::FRAC_PI_2;

use cgmath::*;
use web_time::Duration;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// WGPU normalized device coordinates range from -1 to 1 in X and Y, and 0 to 1 in Z.
///
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Closest the orbit may get to its target
const MIN_DISTANCE: f32 = 1.5;

/// A camera orbiting a fixed target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera looks at
    pub target: Point3<f32>,
    /// Distance from the target
    pub distance: f32,
    /// Horizontal angle around the Y axis
    pub yaw: Rad<f32>,
    /// Vertical angle above the XZ plane
    pub pitch: Rad<f32>,
}

impl OrbitCamera {
    /// Creates an orbit camera.
    ///
    /// # Arguments
    /// * `target` - Point to orbit around
    /// * `distance` - Distance from the target, clamped to a small minimum
    /// * `yaw` - Initial horizontal angle
    /// * `pitch` - Initial vertical angle, clamped short of the poles
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        target: V,
        distance: f32,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            target: target.into(),
            distance: distance.max(MIN_DISTANCE),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// World-space position of the eye.
    pub fn position(&self) -> Point3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        self.target
            + Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin) * self.distance
    }

    /// Calculates the view matrix for this camera.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }

    /// Rotates the orbit by the given angles.
    pub fn orbit(&mut self, delta_yaw: Rad<f32>, delta_pitch: Rad<f32>) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
        self.clamp_pitch();
    }

    /// Moves the eye towards or away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).max(MIN_DISTANCE);
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Accumulates orbit input between frames.
#[derive(Debug, Default)]
pub struct OrbitController {
    amount_left: f32,
    amount_right: f32,
    amount_up: f32,
    amount_down: f32,
    amount_in: f32,
    amount_out: f32,
    // Configuration
    speed: f32,
}

impl OrbitController {
    /// Creates a controller turning at `speed` radians per second.
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Sets which orbit directions are currently held.
    pub fn set_held(&mut self, left: bool, right: bool, up: bool, down: bool) {
        self.amount_left = if left { 1.0 } else { 0.0 };
        self.amount_right = if right { 1.0 } else { 0.0 };
        self.amount_up = if up { 1.0 } else { 0.0 };
        self.amount_down = if down { 1.0 } else { 0.0 };
    }

    /// Sets whether the zoom keys are held.
    pub fn set_zoom_held(&mut self, zoom_in: bool, zoom_out: bool) {
        self.amount_in = if zoom_in { 1.0 } else { 0.0 };
        self.amount_out = if zoom_out { 1.0 } else { 0.0 };
    }

    /// Checks if there are any pending updates that would affect the camera.
    pub fn has_updates(&self) -> bool {
        self.amount_left > 0.0
            || self.amount_right > 0.0
            || self.amount_up > 0.0
            || self.amount_down > 0.0
            || self.amount_in > 0.0
            || self.amount_out > 0.0
    }

    /// Applies the held input to `camera` for a frame of length `dt`.
    pub fn update_camera(&self, camera: &mut OrbitCamera, dt: Duration) {
        let dt = dt.as_secs_f32();
        camera.orbit(
            Rad((self.amount_right - self.amount_left) * self.speed * dt),
            Rad((self.amount_up - self.amount_down) * self.speed * dt),
        );
        camera.zoom((self.amount_out - self.amount_in) * self.speed * 4.0 * dt);
    }
}
