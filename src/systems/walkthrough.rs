//! Headless walkthrough system
//!
//! Drives a [`CollisionController`] through a scene without a window:
//! - Scripted key presses, mouse look and capture changes
//! - Frame delivery through a [`ManualScheduler`]
//! - Per-outcome bookkeeping

use log::{debug, info};
use raywalk_controller::{
    CollisionController, ControllerDebugger, FirstPersonCamera, HeadlessPointerLock, ManualScheduler,
    PointerLock, TickOutcome,
};
use raywalk_input::{KeyBindings, MovementKey};
use raywalk_math::Vec3;
use raywalk_scene::SceneQuery;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::config::{AppConfig, DebugConfig};
use crate::input::{InputAction, InputMapper};

/// One scripted input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAction {
    /// Hold a movement key
    Press(MovementKey),
    /// Let go of a movement key
    Release(MovementKey),
    /// Mouse motion in pixels
    Look { dx: f32, dy: f32 },
    /// Left click
    Click,
    /// Escape key
    Escape,
    /// Capture lost without Escape (focus change)
    Unlock,
    /// F3
    ToggleDebug,
}

/// A script action and the frame it fires on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub frame: u32,
    pub action: ScriptAction,
}

/// Frame counts by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkthroughStats {
    /// Frames the walkthrough ran
    pub frames: u32,
    /// Frames with no controller tick pending
    pub paused: u32,
    pub skipped: u32,
    pub idle: u32,
    pub moved: u32,
    pub slid: u32,
}

impl WalkthroughStats {
    fn record(&mut self, outcome: Option<TickOutcome>) {
        match outcome {
            None => self.paused += 1,
            Some(TickOutcome::Skipped) => self.skipped += 1,
            Some(TickOutcome::Idle) => self.idle += 1,
            Some(TickOutcome::Moved) => self.moved += 1,
            Some(TickOutcome::Slid { .. }) => self.slid += 1,
        }
    }
}

fn new_debugger(config: &DebugConfig) -> ControllerDebugger {
    ControllerDebugger::new(config.max_arrows).with_arrow_length(config.arrow_length)
}

/// Headless host for the collision controller
pub struct WalkthroughSystem {
    controller: CollisionController<FirstPersonCamera>,
    lock: HeadlessPointerLock,
    scheduler: ManualScheduler,
    bindings: KeyBindings,
    mapper: InputMapper,
    debug_config: DebugConfig,
    frame: u32,
    stats: WalkthroughStats,
    exit_requested: bool,
}

impl WalkthroughSystem {
    /// Create a walkthrough starting at `spawn` (the y component is replaced
    /// by the camera height)
    pub fn new(config: &AppConfig, spawn: Vec3) -> Self {
        let lock = HeadlessPointerLock::new();
        let scheduler = ManualScheduler::new();
        let mut controller = CollisionController::new(
            FirstPersonCamera::new(spawn),
            Box::new(lock.clone()),
            Box::new(scheduler.clone()),
            config.controller.clone(),
        );
        if config.debug.enabled {
            controller.set_debugger(Some(new_debugger(&config.debug)));
        }

        Self {
            controller,
            lock,
            scheduler,
            bindings: KeyBindings::default(),
            mapper: InputMapper::default(),
            debug_config: config.debug.clone(),
            frame: 0,
            stats: WalkthroughStats::default(),
            exit_requested: false,
        }
    }

    /// Builder: replace the movement key bindings
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Route a keyboard event: special keys first, then movement bindings
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if let Some(action) = self.mapper.map_key(key, state, self.lock.is_locked()) {
            self.handle_action(action);
        } else if let Some((movement, active)) = self.bindings.process_keyboard(key, state) {
            self.controller.set_movement(movement, active);
        }
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(action) = self.mapper.map_button(button, state, self.lock.is_locked()) {
            self.handle_action(action);
        }
    }

    pub fn handle_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.controller.process_mouse_motion(dx, dy);
    }

    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Capture => self.controller.enable(),
            InputAction::Release => self.controller.disable(),
            InputAction::Exit => {
                info!("Exit requested at frame {}", self.frame);
                self.exit_requested = true;
            }
            InputAction::ToggleDebug => match self.controller.set_debugger(None) {
                Some(mut debugger) => {
                    debugger.destroy();
                    info!("Probe debugger off");
                }
                None => {
                    self.controller.set_debugger(Some(new_debugger(&self.debug_config)));
                    info!("Probe debugger on");
                }
            },
        }
    }

    /// Apply one scripted action
    pub fn apply(&mut self, action: ScriptAction) {
        debug!("Frame {}: {:?}", self.frame, action);
        match action {
            ScriptAction::Press(key) => self.controller.set_movement(key, true),
            ScriptAction::Release(key) => self.controller.set_movement(key, false),
            ScriptAction::Look { dx, dy } => self.handle_mouse_motion(dx, dy),
            ScriptAction::Click => self.handle_mouse_button(MouseButton::Left, ElementState::Pressed),
            ScriptAction::Escape => self.handle_key(KeyCode::Escape, ElementState::Pressed),
            ScriptAction::Unlock => self.lock.release(),
            ScriptAction::ToggleDebug => self.handle_key(KeyCode::F3, ElementState::Pressed),
        }
    }

    /// Deliver the pending controller frame, if there is one
    pub fn step(&mut self, scene: &dyn SceneQuery) -> Option<TickOutcome> {
        let outcome = self
            .scheduler
            .take_pending()
            .map(|frame| self.controller.on_frame(frame, scene));
        self.stats.record(outcome);
        self.stats.frames += 1;
        self.frame += 1;
        outcome
    }

    /// Replay `steps` over `frames` frames, stopping early on exit
    pub fn run(&mut self, scene: &dyn SceneQuery, frames: u32, steps: &[ScriptStep]) -> WalkthroughStats {
        let end = self.frame.saturating_add(frames);
        while self.frame < end && !self.exit_requested {
            let now = self.frame;
            for step in steps.iter().filter(|s| s.frame == now) {
                self.apply(step.action);
            }
            if self.exit_requested {
                break;
            }
            self.step(scene);
        }

        let position = self.controller.camera().position;
        info!(
            "Walkthrough finished after {} frames at ({:.2}, {:.2}, {:.2}): {:?}",
            self.stats.frames, position.x, position.y, position.z, self.stats
        );
        self.stats
    }

    pub fn controller(&self) -> &CollisionController<FirstPersonCamera> {
        &self.controller
    }

    pub fn stats(&self) -> WalkthroughStats {
        self.stats
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raywalk_scene::SceneGraph;

    fn system() -> WalkthroughSystem {
        WalkthroughSystem::new(&AppConfig::default(), Vec3::ZERO)
    }

    #[test]
    fn test_click_captures_and_escape_releases() {
        let mut system = system();
        system.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(system.controller().is_enabled());

        system.handle_key(KeyCode::Escape, ElementState::Pressed);
        assert!(!system.controller().is_enabled());
        assert!(!system.exit_requested());

        system.handle_key(KeyCode::Escape, ElementState::Pressed);
        assert!(system.exit_requested());
    }

    #[test]
    fn test_movement_keys_reach_controller() {
        let mut system = system();
        system.handle_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(system.controller().state().is_moving);
        system.handle_key(KeyCode::KeyW, ElementState::Released);
        assert!(!system.controller().state().is_moving);
    }

    #[test]
    fn test_toggle_debug() {
        let mut system = system();
        assert!(system.controller().debugger().is_none());
        system.apply(ScriptAction::ToggleDebug);
        assert!(system.controller().debugger().is_some());
        system.apply(ScriptAction::ToggleDebug);
        assert!(system.controller().debugger().is_none());
    }

    #[test]
    fn test_debugger_uses_configured_arrow_length() {
        let mut config = AppConfig::default();
        config.debug.enabled = true;
        config.debug.arrow_length = 4.5;
        let mut system = WalkthroughSystem::new(&config, Vec3::ZERO);

        let scene = SceneGraph::new();
        system.apply(ScriptAction::Click);
        system.apply(ScriptAction::Press(MovementKey::Forward));
        system.step(&scene);

        let debugger = system.controller().debugger().unwrap();
        assert_eq!(debugger.len(), 2);
        assert!(debugger.arrows().all(|a| a.length == 4.5));
    }

    #[test]
    fn test_frames_without_capture_are_paused() {
        let scene = SceneGraph::new();
        let mut system = system();
        let stats = system.run(&scene, 5, &[]);
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.paused, 5);
    }

    #[test]
    fn test_scripted_walk() {
        let scene = SceneGraph::new();
        let mut system = system();
        let steps = [
            ScriptStep { frame: 0, action: ScriptAction::Click },
            ScriptStep { frame: 0, action: ScriptAction::Press(MovementKey::Forward) },
            ScriptStep { frame: 5, action: ScriptAction::Release(MovementKey::Forward) },
        ];
        let stats = system.run(&scene, 8, &steps);

        assert_eq!(stats.moved, 5);
        assert_eq!(stats.idle, 3);
        let z = system.controller().camera().position.z;
        assert!((z + 0.5).abs() < 0.001, "z = {}", z);
    }

    #[test]
    fn test_exit_stops_run() {
        let scene = SceneGraph::new();
        let mut system = system();
        let steps = [ScriptStep { frame: 2, action: ScriptAction::Escape }];
        let stats = system.run(&scene, 10, &steps);
        assert!(system.exit_requested());
        assert_eq!(stats.frames, 2);
    }
}
