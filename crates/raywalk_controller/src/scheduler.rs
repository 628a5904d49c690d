//! Frame scheduling
//!
//! Modeled on request-next-frame: the controller asks for one callback at a
//! time and the host delivers it by calling
//! [`CollisionController::on_frame`](crate::CollisionController::on_frame)
//! with the handle it was given.

use std::cell::RefCell;
use std::rc::Rc;

/// Identifies one requested frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw id of this handle
    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host scheduling surface
pub trait FrameScheduler {
    /// Ask for a callback on the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct SchedulerState {
    next_id: u64,
    pending: Option<FrameHandle>,
    requests: usize,
    cancellations: usize,
}

/// Single-slot scheduler driven by the host loop
///
/// Clones share state: the controller owns one clone and the host keeps
/// another to collect due frames with [`ManualScheduler::take_pending`].
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending frame so the host can deliver it
    pub fn take_pending(&self) -> Option<FrameHandle> {
        self.state.borrow_mut().pending.take()
    }

    /// Peek at the pending frame
    pub fn pending(&self) -> Option<FrameHandle> {
        self.state.borrow().pending
    }

    /// Total frames requested so far
    pub fn request_count(&self) -> usize {
        self.state.borrow().requests
    }

    /// Total requests withdrawn before firing
    pub fn cancel_count(&self) -> usize {
        self.state.borrow().cancellations
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        let handle = FrameHandle(state.next_id);
        state.next_id += 1;
        state.requests += 1;
        state.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(handle) {
            state.pending = None;
            state.cancellations += 1;
        }
    }
}
