//! Movement Input Handling
//!
//! This crate turns movement key state into a horizontal movement direction
//! relative to where the camera is looking.

mod bindings;
mod direction;
mod movement_direction;

pub use bindings::KeyBindings;
pub use direction::{Direction, MovementKey};
pub use movement_direction::{MovementDirection, MovementState, MovementUpdate};
