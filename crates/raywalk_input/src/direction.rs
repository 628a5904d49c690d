//! Single movement directions
//!
//! Each movement key rotates the (flattened) view direction by a fixed angle
//! around the vertical axis:
//!
//! ```text
//!              Z Axis
//!                ^  Forward (no rotation)
//!                |
//!   Left         |         Right
//!   (+90° on Y)  |         (-90° on Y)
//!     <---------(Y)--------->  X Axis
//!                |
//!                |  Backward (180° on Y)
//! ```

use raywalk_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// The four movement keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl MovementKey {
    /// All keys in evaluation order
    pub const ALL: [MovementKey; 4] = [
        MovementKey::Forward,
        MovementKey::Backward,
        MovementKey::Left,
        MovementKey::Right,
    ];

    /// Rotation around +Y applied to the view direction, in radians
    pub fn rotation_offset(self) -> f32 {
        match self {
            MovementKey::Forward => 0.0,
            MovementKey::Backward => PI,
            MovementKey::Left => FRAC_PI_2,
            MovementKey::Right => -FRAC_PI_2,
        }
    }

    /// Position in [`MovementKey::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A movement rule: fixed rotation offset plus an active flag
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    key: MovementKey,
    rotation: Quat,
    /// Set while the key is held
    pub active: bool,
}

impl Direction {
    /// Create an inactive direction for a key
    pub fn new(key: MovementKey) -> Self {
        Self {
            key,
            rotation: Quat::from_rotation_y(key.rotation_offset()),
            active: false,
        }
    }

    /// The key this direction belongs to
    pub fn key(&self) -> MovementKey {
        self.key
    }

    /// Rotate `base` by this direction's offset
    #[inline]
    pub fn apply(&self, base: Vec3) -> Vec3 {
        self.rotation * base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPSILON, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_new_is_inactive() {
        for key in MovementKey::ALL {
            let dir = Direction::new(key);
            assert!(!dir.active);
            assert_eq!(dir.key(), key);
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, key) in MovementKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_forward_is_identity() {
        let v = Vec3::new(0.3, 0.0, 0.7);
        assert_eq!(Direction::new(MovementKey::Forward).apply(v), v);
    }

    #[test]
    fn test_back_reverses() {
        assert_vec_eq(Direction::new(MovementKey::Backward).apply(Vec3::Z), Vec3::NEG_Z);
    }

    #[test]
    fn test_left_and_right_rotations() {
        // Looking down -Z (default camera), left is -X and right is +X
        assert_vec_eq(Direction::new(MovementKey::Left).apply(Vec3::NEG_Z), Vec3::NEG_X);
        assert_vec_eq(Direction::new(MovementKey::Right).apply(Vec3::NEG_Z), Vec3::X);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let base = Vec3::Z;
        let _ = Direction::new(MovementKey::Left).apply(base);
        assert_eq!(base, Vec3::Z);
    }
}
