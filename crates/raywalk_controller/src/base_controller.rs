//! Base controller: camera, movement keys and state snapshots

use log::{debug, info};
use raywalk_input::{MovementDirection, MovementKey, MovementUpdate};
use raywalk_math::{Quat, Vec3};
use std::cell::Cell;
use std::rc::Rc;

use crate::camera::CameraRig;
use crate::config::{ControllerConfig, ControllerConfigUpdate};
use crate::pointer_lock::PointerLock;

/// Snapshot of the controller, derived from the camera pose and the
/// movement keys at the moment it is read
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerState {
    pub position: Vec3,
    pub orientation: Quat,
    /// Unit view direction in world space
    pub view_direction: Vec3,
    /// Unit horizontal movement direction, or zero
    pub movement_direction: Vec3,
    /// Whether any movement key is held
    pub is_moving: bool,
}

/// Owns the camera rig and turns movement intents into camera motion
pub struct BaseController<C: CameraRig> {
    camera: C,
    pointer_lock: Box<dyn PointerLock>,
    movement: MovementDirection,
    config: ControllerConfig,
    /// Shared with the unlock listener so an external unlock disables us
    enabled: Rc<Cell<bool>>,
}

impl<C: CameraRig> BaseController<C> {
    /// Create a disabled controller and place the camera at eye height
    pub fn new(mut camera: C, mut pointer_lock: Box<dyn PointerLock>, config: ControllerConfig) -> Self {
        let mut position = camera.position();
        position.y = config.camera_height;
        camera.set_position(position);

        let enabled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&enabled);
        pointer_lock.set_unlock_listener(Box::new(move || {
            if flag.replace(false) {
                info!("Pointer lock released externally, controller disabled");
            }
        }));

        Self {
            camera,
            pointer_lock,
            movement: MovementDirection::new(),
            config,
            enabled,
        }
    }

    /// Capture the pointer and start accepting input
    pub fn enable(&mut self) {
        self.pointer_lock.lock();
        self.enabled.set(true);
        info!("Controller enabled");
    }

    /// Stop accepting input and release the pointer
    pub fn disable(&mut self) {
        // Clear first so the unlock listener sees an already disabled controller
        let was_enabled = self.enabled.replace(false);
        self.pointer_lock.unlock();
        if was_enabled {
            info!("Controller disabled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Current state; computed fresh on every call
    pub fn state(&self) -> ControllerState {
        let view_direction = self.camera.world_direction();
        ControllerState {
            position: self.camera.position(),
            orientation: self.camera.orientation(),
            view_direction,
            movement_direction: self.movement.get(view_direction),
            is_moving: self.movement.is_moving(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Merge a partial config; applies from the next movement step
    pub fn update_config(&mut self, update: &ControllerConfigUpdate) {
        self.config.merge(update);
        debug!("Controller config updated: {:?}", self.config);
    }

    /// Move by the configured distance along the held keys
    pub fn update_position(&mut self) {
        self.update_position_by(self.config.movement_distance);
    }

    /// Move by `distance`, split evenly between the held keys
    pub fn update_position_by(&mut self, distance: f32) {
        let active = self.movement.active_count();
        if active == 0 {
            return;
        }
        let step = distance / active as f32;

        if self.movement.is_active(MovementKey::Forward) {
            self.camera.move_forward(step);
        }
        if self.movement.is_active(MovementKey::Backward) {
            self.camera.move_forward(-step);
        }
        if self.movement.is_active(MovementKey::Left) {
            self.camera.move_right(-step);
        }
        if self.movement.is_active(MovementKey::Right) {
            self.camera.move_right(step);
        }
    }

    /// Translate the camera directly, bypassing the rig's movement helpers
    pub fn move_camera(&mut self, displacement: Vec3) {
        let position = self.camera.position() + displacement;
        self.camera.set_position(position);
    }

    pub fn move_forward(&mut self, active: bool) {
        self.set_movement(MovementKey::Forward, active);
    }

    pub fn move_backward(&mut self, active: bool) {
        self.set_movement(MovementKey::Backward, active);
    }

    pub fn move_left(&mut self, active: bool) {
        self.set_movement(MovementKey::Left, active);
    }

    pub fn move_right(&mut self, active: bool) {
        self.set_movement(MovementKey::Right, active);
    }

    pub fn set_movement(&mut self, key: MovementKey, active: bool) {
        self.update_movement(MovementUpdate::key(key, active));
    }

    /// Apply a partial key update; absent keys keep their state
    pub fn update_movement(&mut self, update: MovementUpdate) {
        self.movement.update(update);
    }

    /// Mouse look; ignored unless the pointer is captured
    pub fn process_mouse_motion(&mut self, dx: f32, dy: f32) {
        if !self.pointer_lock.is_locked() {
            return;
        }
        let sensitivity = self.config.mouse_sensitivity;
        self.camera.rotate(-dx * sensitivity, -dy * sensitivity);
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn movement(&self) -> &MovementDirection {
        &self.movement
    }
}
