//! Controller configuration

use serde::{Deserialize, Serialize};

use crate::collision_detector::CollisionProbeConfig;

/// Tunables for the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Camera eye height above the ground
    pub camera_height: f32,
    /// Distance moved per frame while keys are held
    pub movement_distance: f32,
    /// World height of the low collision probe
    pub low_collision_height: f32,
    /// World height of the high collision probe
    pub high_collision_height: f32,
    /// Hits closer than this block movement
    pub collision_distance: f32,
    /// Scale applied to the slide vector when blocked
    pub slide_scale: f32,
    /// Radians of rotation per unit of mouse motion
    pub mouse_sensitivity: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            camera_height: 1.5,
            movement_distance: 0.1,
            low_collision_height: 0.2,
            high_collision_height: 2.0,
            collision_distance: 1.0,
            slide_scale: 0.1,
            mouse_sensitivity: 0.002,
        }
    }
}

impl ControllerConfig {
    /// Probe settings for the low detector
    pub fn low_probe(&self) -> CollisionProbeConfig {
        CollisionProbeConfig {
            height: self.low_collision_height,
            collision_distance: self.collision_distance,
        }
    }

    /// Probe settings for the high detector
    pub fn high_probe(&self) -> CollisionProbeConfig {
        CollisionProbeConfig {
            height: self.high_collision_height,
            collision_distance: self.collision_distance,
        }
    }

    /// Merge a partial update; `None` fields keep their current value
    pub fn merge(&mut self, update: &ControllerConfigUpdate) {
        fn apply(target: &mut f32, value: Option<f32>) {
            if let Some(v) = value {
                *target = v;
            }
        }

        apply(&mut self.camera_height, update.camera_height);
        apply(&mut self.movement_distance, update.movement_distance);
        apply(&mut self.low_collision_height, update.low_collision_height);
        apply(&mut self.high_collision_height, update.high_collision_height);
        apply(&mut self.collision_distance, update.collision_distance);
        apply(&mut self.slide_scale, update.slide_scale);
        apply(&mut self.mouse_sensitivity, update.mouse_sensitivity);
    }
}

/// Partial [`ControllerConfig`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfigUpdate {
    pub camera_height: Option<f32>,
    pub movement_distance: Option<f32>,
    pub low_collision_height: Option<f32>,
    pub high_collision_height: Option<f32>,
    pub collision_distance: Option<f32>,
    pub slide_scale: Option<f32>,
    pub mouse_sensitivity: Option<f32>,
}

impl ControllerConfigUpdate {
    /// Update only the movement distance
    pub fn movement_distance(distance: f32) -> Self {
        Self {
            movement_distance: Some(distance),
            ..Default::default()
        }
    }

    /// Whether applying this update changes any collision probe
    pub fn touches_probes(&self) -> bool {
        self.low_collision_height.is_some()
            || self.high_collision_height.is_some()
            || self.collision_distance.is_some()
    }
}
