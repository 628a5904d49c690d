//! Capture and debug actions
//!
//! Everything that is not walking: clicking into the view takes the
//! pointer, Escape gives it back (or quits once it is already free) and the
//! debug key flips the probe debugger.

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Controller-level action for a non-movement input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Take the pointer and enable the controller
    Capture,
    /// Give the pointer back and disable the controller
    Release,
    /// Quit the host
    Exit,
    /// Attach or drop the probe debugger
    ToggleDebug,
}

/// Maps presses to [`InputAction`]s given the current capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMapper {
    debug_key: KeyCode,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self {
            debug_key: KeyCode::F3,
        }
    }
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: use another key for the debugger toggle
    pub fn with_debug_key(mut self, key: KeyCode) -> Self {
        self.debug_key = key;
        self
    }

    /// Action for a key event; releases and movement keys map to nothing
    pub fn map_key(&self, key: KeyCode, state: ElementState, captured: bool) -> Option<InputAction> {
        if !state.is_pressed() {
            return None;
        }
        if key == self.debug_key {
            return Some(InputAction::ToggleDebug);
        }
        match (key, captured) {
            (KeyCode::Escape, true) => Some(InputAction::Release),
            (KeyCode::Escape, false) => Some(InputAction::Exit),
            _ => None,
        }
    }

    /// Action for a mouse button; only a left press on a free pointer captures
    pub fn map_button(&self, button: MouseButton, state: ElementState, captured: bool) -> Option<InputAction> {
        match (button, state.is_pressed(), captured) {
            (MouseButton::Left, true, false) => Some(InputAction::Capture),
            _ => None,
        }
    }
}
