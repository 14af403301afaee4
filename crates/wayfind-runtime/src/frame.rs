#![forbid(unsafe_code)]

//! Animation-frame scheduling seam.
//!
//! # Invariants
//!
//! 1. Every [`FrameId`] handed out by a scheduler is unique for its lifetime.
//! 2. A cancelled id is never reported as due.
//! 3. Cancelling an unknown or already-run id is a no-op.

use std::collections::BTreeSet;

/// Opaque handle for a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    /// Wrap a raw host handle.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw host handle.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Something that can run a callback on the next animation frame.
///
/// The scheduler only hands out ids; whoever drives the frame loop reports a
/// due id back to the owner that requested it.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> FrameId {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, id: FrameId) {
        (**self).cancel_frame(id);
    }
}

/// Deterministic scheduler for tests and headless hosts.
///
/// Requests queue up until [`take_due`](Self::take_due) drains them, which
/// models "the browser painted a frame".
#[derive(Debug, Default, Clone)]
pub struct ManualFrameScheduler {
    next_id: u64,
    pending: BTreeSet<FrameId>,
    requested: u64,
    cancelled: u64,
}

impl ManualFrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all frames that are still pending, in request order.
    pub fn take_due(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Number of frames waiting to run.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether `id` is still waiting to run.
    #[must_use]
    pub fn is_pending(&self, id: FrameId) -> bool {
        self.pending.contains(&id)
    }

    /// Total number of `request_frame` calls.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Number of cancellations that removed a pending frame.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        self.requested += 1;
        let id = FrameId(self.next_id);
        self.pending.insert(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending.remove(&id) {
            self.cancelled += 1;
        }
    }
}
