//! Combined movement direction
//!
//! Handles combinations of held keys (e.g. forward + left is 45° to the
//! left of the view direction). Contributions of every active direction are
//! summed and the sum is normalized once, so diagonals are unit length.

use log::trace;
use raywalk_math::{HorizontalExt, Vec3};
use serde::{Deserialize, Serialize};

use crate::direction::{Direction, MovementKey};

/// Sums shorter than this are treated as cancelled out (e.g. forward + back)
const CANCEL_EPSILON_SQ: f32 = 1e-8;

/// Which movement keys are held
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementState {
    pub front: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementState {
    /// Whether a given key is held
    pub fn get(&self, key: MovementKey) -> bool {
        match key {
            MovementKey::Forward => self.front,
            MovementKey::Backward => self.back,
            MovementKey::Left => self.left,
            MovementKey::Right => self.right,
        }
    }
}

/// Partial update of [`MovementState`]; `None` fields are left untouched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementUpdate {
    pub front: Option<bool>,
    pub back: Option<bool>,
    pub left: Option<bool>,
    pub right: Option<bool>,
}

impl MovementUpdate {
    /// Update touching a single key
    pub fn key(key: MovementKey, active: bool) -> Self {
        let mut update = Self::default();
        match key {
            MovementKey::Forward => update.front = Some(active),
            MovementKey::Backward => update.back = Some(active),
            MovementKey::Left => update.left = Some(active),
            MovementKey::Right => update.right = Some(active),
        }
        update
    }

    fn get(&self, key: MovementKey) -> Option<bool> {
        match key {
            MovementKey::Forward => self.front,
            MovementKey::Backward => self.back,
            MovementKey::Left => self.left,
            MovementKey::Right => self.right,
        }
    }
}

impl From<MovementState> for MovementUpdate {
    fn from(state: MovementState) -> Self {
        Self {
            front: Some(state.front),
            back: Some(state.back),
            left: Some(state.left),
            right: Some(state.right),
        }
    }
}

/// The four directions and their active flags
#[derive(Clone, Debug)]
pub struct MovementDirection {
    directions: [Direction; 4],
}

impl Default for MovementDirection {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementDirection {
    /// Create with every direction inactive
    pub fn new() -> Self {
        Self {
            directions: MovementKey::ALL.map(Direction::new),
        }
    }

    /// Merge a partial state into the active flags
    pub fn update(&mut self, update: MovementUpdate) {
        for dir in &mut self.directions {
            if let Some(active) = update.get(dir.key()) {
                dir.active = active;
            }
        }
        trace!("Movement state: {:?}", self.movement_registry());
    }

    /// Set a single key
    pub fn set(&mut self, key: MovementKey, active: bool) {
        self.directions[key.index()].active = active;
    }

    /// Whether a key is held
    pub fn is_active(&self, key: MovementKey) -> bool {
        self.directions[key.index()].active
    }

    /// Snapshot of the active flags
    pub fn movement_registry(&self) -> MovementState {
        MovementState {
            front: self.is_active(MovementKey::Forward),
            back: self.is_active(MovementKey::Backward),
            left: self.is_active(MovementKey::Left),
            right: self.is_active(MovementKey::Right),
        }
    }

    /// Number of held keys
    pub fn active_count(&self) -> usize {
        self.directions.iter().filter(|d| d.active).count()
    }

    /// Whether any key is held
    pub fn is_moving(&self) -> bool {
        self.directions.iter().any(|d| d.active)
    }

    /// Movement direction for a view direction
    ///
    /// The result lies on the X-Z plane and is either unit length or zero.
    /// It is zero when nothing is held, when opposite keys cancel, or when
    /// the view has no horizontal component.
    pub fn get(&self, view_direction: Vec3) -> Vec3 {
        let base = view_direction.horizontal_dir();
        if base == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let sum = self
            .directions
            .iter()
            .filter(|d| d.active)
            .fold(Vec3::ZERO, |sum, d| sum + d.apply(base))
            .flattened();

        if sum.length_squared() < CANCEL_EPSILON_SQ {
            Vec3::ZERO
        } else {
            sum.normalize()
        }
    }
}
