//! Pointer/input capture
//!
//! The host owns the actual capture (cursor grab, browser pointer lock).
//! The controller locks it on enable, unlocks it on disable, and registers
//! a single listener so an unlock it did not ask for (the user pressing
//! Escape, the window losing focus) disables it too.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Callback fired when the capture is released
pub type UnlockListener = Box<dyn FnMut()>;

/// Pointer/input capture abstraction
pub trait PointerLock {
    /// Request capture
    fn lock(&mut self);

    /// Release capture; fires the unlock listener if capture was held
    fn unlock(&mut self);

    fn is_locked(&self) -> bool;

    /// Install the unlock listener, replacing any previous one
    fn set_unlock_listener(&mut self, listener: UnlockListener);
}

#[derive(Default)]
struct LockState {
    locked: bool,
    listener: Option<UnlockListener>,
}

/// In-process pointer lock for headless hosts and tests
///
/// Clones share the same state, so the host can keep a handle and call
/// [`HeadlessPointerLock::release`] to simulate an external unlock while
/// the controller owns another clone.
#[derive(Clone, Default)]
pub struct HeadlessPointerLock {
    state: Rc<RefCell<LockState>>,
}

impl HeadlessPointerLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the capture from outside the controller (e.g. Escape)
    pub fn release(&self) {
        let was_locked = std::mem::replace(&mut self.state.borrow_mut().locked, false);
        if was_locked {
            self.notify_unlock();
        }
    }

    fn notify_unlock(&self) {
        // Take the listener out so it may call back into this lock
        let listener = self.state.borrow_mut().listener.take();
        if let Some(mut listener) = listener {
            listener();
            let mut state = self.state.borrow_mut();
            if state.listener.is_none() {
                state.listener = Some(listener);
            }
        }
    }
}

impl PointerLock for HeadlessPointerLock {
    fn lock(&mut self) {
        self.state.borrow_mut().locked = true;
    }

    fn unlock(&mut self) {
        self.release();
    }

    fn is_locked(&self) -> bool {
        self.state.borrow().locked
    }

    fn set_unlock_listener(&mut self, listener: UnlockListener) {
        self.state.borrow_mut().listener = Some(listener);
    }
}

impl fmt::Debug for HeadlessPointerLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessPointerLock")
            .field("locked", &state.locked)
            .field("has_listener", &state.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_listener(lock: &mut HeadlessPointerLock) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        lock.set_unlock_listener(Box::new(move || c.set(c.get() + 1)));
        count
    }

    #[test]
    fn test_lock_unlock() {
        let mut lock = HeadlessPointerLock::new();
        assert!(!lock.is_locked());
        lock.lock();
        assert!(lock.is_locked());
        lock.unlock();
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_release_notifies_listener() {
        let mut lock = HeadlessPointerLock::new();
        let count = counting_listener(&mut lock);

        lock.lock();
        lock.release();
        assert_eq!(count.get(), 1);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_release_when_unlocked_is_silent() {
        let mut lock = HeadlessPointerLock::new();
        let count = counting_listener(&mut lock);
        lock.release();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let mut owned = HeadlessPointerLock::new();
        let host = owned.clone();
        let count = counting_listener(&mut owned);

        owned.lock();
        assert!(host.is_locked());
        host.release();
        assert!(!owned.is_locked());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_listener_survives_notification() {
        let mut lock = HeadlessPointerLock::new();
        let count = counting_listener(&mut lock);

        for _ in 0..3 {
            lock.lock();
            lock.release();
        }
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_debug_format() {
        let lock = HeadlessPointerLock::new();
        let debug = format!("{:?}", lock);
        assert!(debug.contains("locked"));
    }
}
