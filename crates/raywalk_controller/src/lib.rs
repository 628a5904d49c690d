//! First-person controller with collision avoidance
//!
//! The controller moves a camera on the ground plane from movement key
//! state and probes the scene with two horizontal rays (a low one and a high
//! one) each frame. When a probe hits a surface closer than the collision
//! distance the camera slides along that surface instead of walking into it.
//!
//! ## Host seams
//!
//! - [`CameraRig`] - Camera pose the controller reads and moves
//! - [`PointerLock`] - Pointer/input capture with an unlock notification
//! - [`FrameScheduler`] - Request-next-frame scheduling
//! - [`raywalk_scene::SceneQuery`] - Ray queries against the scene
//!
//! ## Controllers
//!
//! - [`BaseController`] - Camera, movement keys and state snapshots
//! - [`CollisionDetector`] - One probe ray at a fixed height
//! - [`CollisionController`] - The per-frame decision loop
//! - [`ControllerDebugger`] - Optional probe/normal arrow visualisation

mod base_controller;
mod camera;
mod collision_controller;
mod collision_detector;
mod config;
mod debugger;
mod pointer_lock;
mod scheduler;

pub use base_controller::{BaseController, ControllerState};
pub use camera::{CameraRig, FirstPersonCamera};
pub use collision_controller::{CollisionController, TickOutcome};
pub use collision_detector::{CollisionDetector, CollisionProbeConfig, Hit};
pub use config::{ControllerConfig, ControllerConfigUpdate};
pub use debugger::{Color, ControllerDebugger, DebugArrow, DebugSink, LineVertex, DEFAULT_ARROW_LENGTH, DEFAULT_MAX_ARROWS};
pub use pointer_lock::{HeadlessPointerLock, PointerLock, UnlockListener};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
