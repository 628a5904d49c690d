//! Camera rig
//!
//! The controller never owns rendering state; it only needs to read and
//! nudge a camera pose. [`CameraRig`] is that surface, and
//! [`FirstPersonCamera`] is a yaw/pitch implementation of it.

use raywalk_math::{EulerRot, HorizontalExt, Quat, Vec3, UP};
use std::f32::consts::FRAC_PI_2;

/// Trait for camera pose access
/// Allows the controller to work with different camera implementations
pub trait CameraRig {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn orientation(&self) -> Quat;

    /// Unit view direction in world space (cameras look down their local -Z)
    fn world_direction(&self) -> Vec3 {
        (self.orientation() * Vec3::NEG_Z).normalize_or_zero()
    }

    /// Move along the view direction projected onto the ground plane
    fn move_forward(&mut self, distance: f32);

    /// Move along the camera's horizontal right vector
    fn move_right(&mut self, distance: f32);

    /// Turn by yaw (around +Y) and pitch (around local X) deltas in radians
    fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32);
}

/// Yaw/pitch camera with no roll
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    /// Rotation around +Y in radians; positive turns left
    yaw: f32,
    /// Rotation around local X in radians; positive looks up
    pitch: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl FirstPersonCamera {
    /// Create a camera looking down -Z
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Builder: set yaw and pitch (pitch is clamped)
    pub fn with_yaw_pitch(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        self
    }

    /// Builder: face a horizontal direction
    pub fn facing(mut self, direction: Vec3) -> Self {
        let dir = direction.horizontal_dir();
        if dir != Vec3::ZERO {
            // yaw 0 looks down -Z; positive yaw turns toward -X
            self.yaw = (-dir.x).atan2(-dir.z);
        }
        self
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    fn right(&self) -> Vec3 {
        (Quat::from_rotation_y(self.yaw) * Vec3::X).horizontal_dir()
    }
}

impl CameraRig for FirstPersonCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    fn move_forward(&mut self, distance: f32) {
        let forward = UP.cross(self.right());
        self.position += forward * distance;
    }

    fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        // Clamp pitch so the camera cannot flip over
        self.pitch = (self.pitch + delta_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}
