//! Keyboard bindings for movement keys
//!
//! Default layout:
//! - W / ArrowUp: Forward
//! - S / ArrowDown: Backward
//! - A / ArrowLeft: Left
//! - D / ArrowRight: Right

use std::collections::HashMap;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::direction::MovementKey;

/// Maps physical keys to movement keys
#[derive(Clone, Debug)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, MovementKey>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// WASD plus arrow keys
    pub fn new() -> Self {
        let bindings = HashMap::from([
            (KeyCode::KeyW, MovementKey::Forward),
            (KeyCode::KeyS, MovementKey::Backward),
            (KeyCode::KeyA, MovementKey::Left),
            (KeyCode::KeyD, MovementKey::Right),
            (KeyCode::ArrowUp, MovementKey::Forward),
            (KeyCode::ArrowDown, MovementKey::Backward),
            (KeyCode::ArrowLeft, MovementKey::Left),
            (KeyCode::ArrowRight, MovementKey::Right),
        ]);
        Self { bindings }
    }

    /// No bindings at all
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Builder: bind a key
    pub fn with_binding(mut self, key: KeyCode, movement: MovementKey) -> Self {
        self.bind(key, movement);
        self
    }

    /// Bind a key, replacing any previous binding for it
    pub fn bind(&mut self, key: KeyCode, movement: MovementKey) {
        self.bindings.insert(key, movement);
    }

    /// Remove a binding
    pub fn unbind(&mut self, key: KeyCode) -> Option<MovementKey> {
        self.bindings.remove(&key)
    }

    /// Look up a key
    pub fn get(&self, key: KeyCode) -> Option<MovementKey> {
        self.bindings.get(&key).copied()
    }

    /// Process keyboard input
    ///
    /// Returns the movement key and whether it is now held, or None if the
    /// key is not a movement key.
    pub fn process_keyboard(&self, key: KeyCode, state: ElementState) -> Option<(MovementKey, bool)> {
        let movement = self.get(key)?;
        Some((movement, state == ElementState::Pressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasd_defaults() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.get(KeyCode::KeyW), Some(MovementKey::Forward));
        assert_eq!(bindings.get(KeyCode::KeyS), Some(MovementKey::Backward));
        assert_eq!(bindings.get(KeyCode::KeyA), Some(MovementKey::Left));
        assert_eq!(bindings.get(KeyCode::KeyD), Some(MovementKey::Right));
    }

    #[test]
    fn test_arrow_defaults() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(KeyCode::ArrowUp), Some(MovementKey::Forward));
        assert_eq!(bindings.get(KeyCode::ArrowRight), Some(MovementKey::Right));
    }

    #[test]
    fn test_press_and_release() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.process_keyboard(KeyCode::KeyA, ElementState::Pressed),
            Some((MovementKey::Left, true))
        );
        assert_eq!(
            bindings.process_keyboard(KeyCode::KeyA, ElementState::Released),
            Some((MovementKey::Left, false))
        );
    }

    #[test]
    fn test_unbound_key_ignored() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.process_keyboard(KeyCode::KeyQ, ElementState::Pressed), None);
    }

    #[test]
    fn test_rebinding() {
        let mut bindings = KeyBindings::empty().with_binding(KeyCode::KeyZ, MovementKey::Forward);
        assert_eq!(bindings.get(KeyCode::KeyZ), Some(MovementKey::Forward));
        assert_eq!(bindings.get(KeyCode::KeyW), None);

        bindings.bind(KeyCode::KeyZ, MovementKey::Backward);
        assert_eq!(bindings.get(KeyCode::KeyZ), Some(MovementKey::Backward));

        assert_eq!(bindings.unbind(KeyCode::KeyZ), Some(MovementKey::Backward));
        assert_eq!(bindings.get(KeyCode::KeyZ), None);
    }
}
