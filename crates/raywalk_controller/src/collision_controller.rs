//! Per-frame collision loop

use log::{debug, info, trace};
use raywalk_input::{MovementKey, MovementUpdate};
use raywalk_math::{HorizontalExt, Vec3};
use raywalk_scene::SceneQuery;

use crate::base_controller::{BaseController, ControllerState};
use crate::camera::CameraRig;
use crate::collision_detector::{CollisionDetector, Hit};
use crate::config::{ControllerConfig, ControllerConfigUpdate};
use crate::debugger::{ControllerDebugger, DebugSink};
use crate::pointer_lock::PointerLock;
use crate::scheduler::{FrameHandle, FrameScheduler};

/// What a delivered frame did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Stale frame or disabled controller; nothing ran and nothing was rescheduled
    Skipped,
    /// No movement key held
    Idle,
    /// Free movement at the configured speed
    Moved,
    /// Blocked; the camera was nudged along the obstacle instead
    Slid { displacement: Vec3 },
}

/// Walks the camera through a scene, sliding along anything the probes hit
///
/// Two detectors run every moving frame: a low one for knee-high obstacles
/// and a high one for overhangs. The nearer collision decides the response.
pub struct CollisionController<C: CameraRig> {
    base: BaseController<C>,
    low_probe: CollisionDetector,
    high_probe: CollisionDetector,
    scheduler: Box<dyn FrameScheduler>,
    pending_frame: Option<FrameHandle>,
    debugger: Option<ControllerDebugger>,
}

impl<C: CameraRig> CollisionController<C> {
    pub fn new(
        camera: C,
        pointer_lock: Box<dyn PointerLock>,
        scheduler: Box<dyn FrameScheduler>,
        config: ControllerConfig,
    ) -> Self {
        let low_probe = CollisionDetector::new(config.low_probe());
        let high_probe = CollisionDetector::new(config.high_probe());
        Self {
            base: BaseController::new(camera, pointer_lock, config),
            low_probe,
            high_probe,
            scheduler,
            pending_frame: None,
            debugger: None,
        }
    }

    /// Builder: attach a debugger
    pub fn with_debugger(mut self, debugger: ControllerDebugger) -> Self {
        self.debugger = Some(debugger);
        self
    }

    /// Replace the debugger, returning the previous one
    pub fn set_debugger(&mut self, debugger: Option<ControllerDebugger>) -> Option<ControllerDebugger> {
        std::mem::replace(&mut self.debugger, debugger)
    }

    pub fn debugger(&self) -> Option<&ControllerDebugger> {
        self.debugger.as_ref()
    }

    /// Capture input and start the frame loop
    ///
    /// Calling this while already running keeps the single pending frame.
    pub fn enable(&mut self) {
        if !self.base.is_enabled() {
            self.base.enable();
        }
        if self.pending_frame.is_none() {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
    }

    /// Release input and stop the frame loop
    pub fn disable(&mut self) {
        self.base.disable();
        if let Some(frame) = self.pending_frame.take() {
            self.scheduler.cancel_frame(frame);
            debug!("Cancelled pending frame {}", frame.id());
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    /// Frame the controller is waiting for
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Host callback for a requested frame
    ///
    /// Runs one tick and requests the next frame. Frames that are not the
    /// pending one, or that arrive after the controller was disabled, are
    /// dropped and end the loop.
    pub fn on_frame(&mut self, frame: FrameHandle, scene: &dyn SceneQuery) -> TickOutcome {
        if self.pending_frame != Some(frame) {
            trace!("Ignoring stale frame {}", frame.id());
            return TickOutcome::Skipped;
        }
        self.pending_frame = None;

        if !self.base.is_enabled() {
            debug!("Frame {} arrived after disable, stopping loop", frame.id());
            return TickOutcome::Skipped;
        }

        let outcome = self.tick(scene);
        self.pending_frame = Some(self.scheduler.request_frame());
        outcome
    }

    /// One read-detect-respond step, independent of frame scheduling
    pub fn tick(&mut self, scene: &dyn SceneQuery) -> TickOutcome {
        let state = self.base.state();
        if !state.is_moving {
            return TickOutcome::Idle;
        }

        match self.nearest_collision(&state, scene) {
            None => {
                self.base.update_position();
                TickOutcome::Moved
            }
            Some(hit) => {
                let slide = state.movement_direction + hit.horizontal_normal();
                let displacement = (slide * self.base.config().slide_scale).flattened();
                self.base.move_camera(displacement);
                trace!("Sliding along {:?} by {:?}", hit.node, displacement);
                TickOutcome::Slid { displacement }
            }
        }
    }

    /// Nearer of the two probe hits; the low probe wins ties
    fn nearest_collision(&mut self, state: &ControllerState, scene: &dyn SceneQuery) -> Option<Hit> {
        // One sink borrow per probe; the first must end before the second starts
        let low = self.low_probe.get_collision(
            state,
            scene,
            self.debugger.as_mut().map(|d| d as &mut dyn DebugSink),
        );
        let high = self.high_probe.get_collision(
            state,
            scene,
            self.debugger.as_mut().map(|d| d as &mut dyn DebugSink),
        );

        match (low, high) {
            (Some(low), Some(high)) if high.distance < low.distance => Some(high),
            (Some(low), _) => Some(low),
            (None, high) => high,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> ControllerState {
        self.base.state()
    }

    pub fn config(&self) -> &ControllerConfig {
        self.base.config()
    }

    /// Merge a partial config, rebuilding the probes when they change
    pub fn update_config(&mut self, update: &ControllerConfigUpdate) {
        self.base.update_config(update);
        if update.touches_probes() {
            let config = self.base.config();
            self.low_probe = CollisionDetector::new(config.low_probe());
            self.high_probe = CollisionDetector::new(config.high_probe());
            info!(
                "Collision probes rebuilt at heights {} / {} (distance {})",
                config.low_collision_height, config.high_collision_height, config.collision_distance
            );
        }
    }

    pub fn low_probe(&self) -> &CollisionDetector {
        &self.low_probe
    }

    pub fn high_probe(&self) -> &CollisionDetector {
        &self.high_probe
    }

    pub fn move_forward(&mut self, active: bool) {
        self.base.move_forward(active);
    }

    pub fn move_backward(&mut self, active: bool) {
        self.base.move_backward(active);
    }

    pub fn move_left(&mut self, active: bool) {
        self.base.move_left(active);
    }

    pub fn move_right(&mut self, active: bool) {
        self.base.move_right(active);
    }

    pub fn set_movement(&mut self, key: MovementKey, active: bool) {
        self.base.set_movement(key, active);
    }

    pub fn update_movement(&mut self, update: MovementUpdate) {
        self.base.update_movement(update);
    }

    pub fn process_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.base.process_mouse_motion(dx, dy);
    }

    pub fn base(&self) -> &BaseController<C> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseController<C> {
        &mut self.base
    }

    pub fn camera(&self) -> &C {
        self.base.camera()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FirstPersonCamera;
    use crate::debugger::Color;
    use crate::pointer_lock::HeadlessPointerLock;
    use crate::scheduler::ManualScheduler;
    use raywalk_math::{Mat4, Ray3};
    use raywalk_scene::{Intersection, NodeKey, SceneLayers};
    use std::cell::Cell;

    const EPSILON: f32 = 0.0001;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPSILON, "{:?} != {:?}", a, b);
    }

    /// Scene returning the same intersections for every ray
    struct CannedScene {
        hits: Vec<Intersection>,
        queries: Cell<usize>,
    }

    impl CannedScene {
        fn empty() -> Self {
            Self::with_hits(vec![])
        }

        fn with_hits(hits: Vec<Intersection>) -> Self {
            Self {
                hits,
                queries: Cell::new(0),
            }
        }
    }

    impl SceneQuery for CannedScene {
        fn children(&self) -> Vec<NodeKey> {
            vec![NodeKey::default()]
        }

        fn layers(&self, _key: NodeKey) -> SceneLayers {
            SceneLayers::GEOMETRY
        }

        fn intersect_objects(&self, _ray: &Ray3, _objects: &[NodeKey], _recursive: bool) -> Vec<Intersection> {
            self.queries.set(self.queries.get() + 1);
            self.hits.clone()
        }
    }

    /// Scene with one hit per probe height
    struct TwoHeightScene {
        low: Intersection,
        high: Intersection,
    }

    impl SceneQuery for TwoHeightScene {
        fn children(&self) -> Vec<NodeKey> {
            vec![NodeKey::default()]
        }

        fn layers(&self, _key: NodeKey) -> SceneLayers {
            SceneLayers::GEOMETRY
        }

        fn intersect_objects(&self, ray: &Ray3, _objects: &[NodeKey], _recursive: bool) -> Vec<Intersection> {
            if ray.origin.y < 1.0 {
                vec![self.low]
            } else {
                vec![self.high]
            }
        }
    }

    fn wall_hit(distance: f32, normal: Vec3) -> Intersection {
        Intersection {
            node: NodeKey::default(),
            distance,
            point: Vec3::new(0.0, 0.2, -distance),
            normal: Some(normal),
            object_transform: Some(Mat4::IDENTITY),
        }
    }

    struct Rig {
        controller: CollisionController<FirstPersonCamera>,
        lock: HeadlessPointerLock,
        scheduler: ManualScheduler,
    }

    fn rig() -> Rig {
        let lock = HeadlessPointerLock::new();
        let scheduler = ManualScheduler::new();
        let controller = CollisionController::new(
            FirstPersonCamera::new(Vec3::ZERO),
            Box::new(lock.clone()),
            Box::new(scheduler.clone()),
            ControllerConfig::default(),
        );
        Rig {
            controller,
            lock,
            scheduler,
        }
    }

    impl Rig {
        /// Deliver the pending frame, if any
        fn frame(&mut self, scene: &dyn SceneQuery) -> Option<TickOutcome> {
            let frame = self.scheduler.take_pending()?;
            Some(self.controller.on_frame(frame, scene))
        }
    }

    #[test]
    fn test_no_keys_short_circuits() {
        let mut rig = rig();
        let scene = CannedScene::with_hits(vec![wall_hit(0.5, Vec3::X)]);
        rig.controller.enable();
        let before = rig.controller.camera().position;

        assert_eq!(rig.frame(&scene), Some(TickOutcome::Idle));
        assert_eq!(rig.controller.camera().position, before);
        assert_eq!(scene.queries.get(), 0);
        // Idle frames still reschedule
        assert!(rig.scheduler.pending().is_some());
    }

    #[test]
    fn test_free_movement() {
        let mut rig = rig();
        let scene = CannedScene::empty();
        rig.controller.enable();
        rig.controller.move_forward(true);

        assert_eq!(rig.frame(&scene), Some(TickOutcome::Moved));
        assert_vec_eq(rig.controller.camera().position, Vec3::new(0.0, 1.5, -0.1));
        // One query per probe
        assert_eq!(scene.queries.get(), 2);
    }

    #[test]
    fn test_wall_slides() {
        let mut rig = rig();
        let scene = CannedScene::with_hits(vec![wall_hit(0.5, Vec3::X)]);
        rig.controller.enable();
        rig.controller.move_forward(true);

        let outcome = rig.frame(&scene);
        let expected = Vec3::new(0.1, 0.0, -0.1);
        match outcome {
            Some(TickOutcome::Slid { displacement }) => assert_vec_eq(displacement, expected),
            other => panic!("expected a slide, got {:?}", other),
        }
        assert_vec_eq(rig.controller.camera().position, Vec3::new(0.1, 1.5, -0.1));
    }

    #[test]
    fn test_collision_at_threshold_moves_freely() {
        let mut rig = rig();
        let scene = CannedScene::with_hits(vec![wall_hit(1.0, Vec3::X)]);
        rig.controller.enable();
        rig.controller.move_forward(true);
        assert_eq!(rig.frame(&scene), Some(TickOutcome::Moved));
    }

    #[test]
    fn test_nearest_probe_wins() {
        let mut rig = rig();
        let scene = TwoHeightScene {
            low: wall_hit(0.8, Vec3::X),
            high: wall_hit(0.3, Vec3::NEG_X),
        };
        rig.controller.move_forward(true);

        match rig.controller.tick(&scene) {
            TickOutcome::Slid { displacement } => assert_vec_eq(displacement, Vec3::new(-0.1, 0.0, -0.1)),
            other => panic!("expected a slide, got {:?}", other),
        }
    }

    #[test]
    fn test_low_probe_wins_ties() {
        let mut rig = rig();
        let scene = TwoHeightScene {
            low: wall_hit(0.5, Vec3::X),
            high: wall_hit(0.5, Vec3::NEG_X),
        };
        rig.controller.move_forward(true);

        match rig.controller.tick(&scene) {
            TickOutcome::Slid { displacement } => assert_vec_eq(displacement, Vec3::new(0.1, 0.0, -0.1)),
            other => panic!("expected a slide, got {:?}", other),
        }
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut rig = rig();
        rig.controller.enable();
        rig.controller.enable();
        assert_eq!(rig.scheduler.request_count(), 1);
        assert!(rig.lock.is_locked());
    }

    #[test]
    fn test_disable_stops_ticks() {
        let mut rig = rig();
        let scene = CannedScene::empty();
        rig.controller.enable();
        rig.controller.move_forward(true);

        let frame = rig.scheduler.pending().unwrap();
        rig.controller.disable();
        assert_eq!(rig.scheduler.pending(), None);
        assert_eq!(rig.scheduler.cancel_count(), 1);

        // A host that still delivers the old frame gets nothing
        let before = rig.controller.camera().position;
        assert_eq!(rig.controller.on_frame(frame, &scene), TickOutcome::Skipped);
        assert_eq!(rig.controller.camera().position, before);
        assert_eq!(rig.scheduler.request_count(), 1);
    }

    #[test]
    fn test_external_unlock_ends_loop() {
        let mut rig = rig();
        let scene = CannedScene::empty();
        rig.controller.enable();
        rig.controller.move_forward(true);
        assert_eq!(rig.frame(&scene), Some(TickOutcome::Moved));

        rig.lock.release();
        assert!(!rig.controller.is_enabled());

        let before = rig.controller.camera().position;
        assert_eq!(rig.frame(&scene), Some(TickOutcome::Skipped));
        assert_eq!(rig.frame(&scene), None);
        assert_eq!(rig.controller.camera().position, before);
    }

    #[test]
    fn test_reenable_after_external_unlock() {
        let mut rig = rig();
        let scene = CannedScene::empty();
        rig.controller.enable();
        rig.lock.release();

        // The old frame is still pending, so enabling must not add another
        rig.controller.enable();
        assert_eq!(rig.scheduler.request_count(), 1);
        assert_eq!(rig.frame(&scene), Some(TickOutcome::Idle));
        assert_eq!(rig.scheduler.request_count(), 2);
    }

    #[test]
    fn test_stale_frame_ignored() {
        let mut rig = rig();
        let scene = CannedScene::empty();
        rig.controller.enable();
        let first = rig.scheduler.take_pending().unwrap();
        assert_eq!(rig.controller.on_frame(first, &scene), TickOutcome::Idle);
        assert_eq!(rig.controller.on_frame(first, &scene), TickOutcome::Skipped);
        assert_eq!(rig.scheduler.request_count(), 2);
    }

    #[test]
    fn test_update_config_round_trip() {
        let mut rig = rig();
        rig.controller.update_config(&ControllerConfigUpdate::movement_distance(0.5));

        let expected = ControllerConfig {
            movement_distance: 0.5,
            ..ControllerConfig::default()
        };
        assert_eq!(rig.controller.config(), &expected);
        assert_eq!(rig.controller.low_probe().config().height, 0.2);
    }

    #[test]
    fn test_update_config_rebuilds_probes() {
        let mut rig = rig();
        rig.controller.update_config(&ControllerConfigUpdate {
            low_collision_height: Some(0.4),
            collision_distance: Some(2.0),
            ..Default::default()
        });
        assert_eq!(rig.controller.low_probe().config().height, 0.4);
        assert_eq!(rig.controller.low_probe().config().collision_distance, 2.0);
        assert_eq!(rig.controller.high_probe().config().collision_distance, 2.0);

        // A hit at 1.5 now blocks
        let scene = CannedScene::with_hits(vec![wall_hit(1.5, Vec3::X)]);
        rig.controller.move_forward(true);
        assert!(matches!(rig.controller.tick(&scene), TickOutcome::Slid { .. }));
    }

    #[test]
    fn test_debugger_collects_probe_arrows() {
        let mut rig = rig();
        rig.controller.set_debugger(Some(ControllerDebugger::new(10)));
        let scene = CannedScene::with_hits(vec![wall_hit(0.5, Vec3::X)]);
        rig.controller.move_forward(true);
        rig.controller.tick(&scene);

        // Probe plus normal for each of the two detectors
        assert_eq!(rig.controller.debugger().map(|d| d.len()), Some(4));
    }

    #[test]
    fn test_debugger_sees_both_probes_and_keeps_nearest() {
        let mut rig = rig();
        rig.controller.set_debugger(Some(ControllerDebugger::default()));
        let scene = TwoHeightScene {
            low: wall_hit(0.8, Vec3::X),
            high: wall_hit(0.3, Vec3::NEG_X),
        };
        rig.controller.move_forward(true);

        match rig.controller.tick(&scene) {
            TickOutcome::Slid { displacement } => assert_vec_eq(displacement, Vec3::new(-0.1, 0.0, -0.1)),
            other => panic!("expected a slide, got {:?}", other),
        }

        let heights: Vec<f32> = rig
            .controller
            .debugger()
            .unwrap()
            .arrows()
            .filter(|a| a.color == Color::RED)
            .map(|a| a.origin.y)
            .collect();
        assert_eq!(heights, vec![0.2, 2.0]);
    }
}
