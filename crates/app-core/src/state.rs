//! Camera state shared with the web frontend.
//!
//! These types avoid platform APIs; the frontend uses them to build view
//! matrices and billboard axes.

use crate::constants::{
    CAMERA_DISTANCE, CAMERA_FOVY_RADIANS, CAMERA_ZFAR, CAMERA_ZNEAR, ORBIT_PITCH_LIMIT,
    ORBIT_SENSITIVITY,
};
use glam::{Mat4, Vec3};

/// Right-handed camera with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_RADIANS,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space right and up axes of the camera plane, used to expand
    /// camera-facing quads.
    pub fn billboard_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        (right, up)
    }
}

/// Pointer-driven orbit around the scene origin at a fixed distance.
#[derive(Clone, Copy, Debug)]
pub struct OrbitRig {
    yaw: f32,
    pitch: f32,
    distance: f32,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitRig {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: CAMERA_DISTANCE,
        }
    }

    /// Apply a pointer drag in pixels. Pitch is clamped away from the poles
    /// so the up vector never degenerates.
    pub fn apply_drag(&mut self, dx_px: f32, dy_px: f32) {
        self.yaw -= dx_px * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch - dy_px * ORBIT_SENSITIVITY)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}
