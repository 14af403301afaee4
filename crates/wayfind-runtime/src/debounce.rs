#![forbid(unsafe_code)]

//! Cancel-and-reschedule debouncing onto animation frames.
//!
//! Scroll and resize listeners can fire many times per frame. Each call to
//! [`FrameDebouncer::schedule`] cancels the previously requested frame before
//! requesting a new one, so a burst collapses into a single callback.
//!
//! # Invariants
//!
//! 1. At most one frame is outstanding per debouncer.
//! 2. [`FrameDebouncer::fire`] accepts only the outstanding id; stale ids from
//!    a cancelled request are rejected.
//! 3. After [`FrameDebouncer::cancel`], nothing is outstanding and the
//!    scheduler holds no frame for this debouncer.

use crate::frame::{FrameId, FrameScheduler};

/// Holds the single outstanding frame handle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameDebouncer {
    pending: Option<FrameId>,
}

impl FrameDebouncer {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Request a frame, cancelling the outstanding one first.
    pub fn schedule<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> FrameId {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel_frame(previous);
            #[cfg(feature = "tracing")]
            tracing::trace!(frame = previous.raw(), "coalesced pending frame");
        }
        let id = scheduler.request_frame();
        self.pending = Some(id);
        id
    }

    /// Consume the outstanding frame if `id` matches it.
    ///
    /// Returns `true` when the caller should run its deferred work.
    pub fn fire(&mut self, id: FrameId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancel the outstanding frame, if any.
    pub fn cancel<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel_frame(id);
        }
    }

    /// The outstanding frame, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Whether a frame is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualFrameScheduler;

    #[test]
    fn burst_collapses_to_one_frame() {
        let mut s = ManualFrameScheduler::new();
        let mut d = FrameDebouncer::new();
        let mut last = None;
        for _ in 0..10 {
            last = Some(d.schedule(&mut s));
        }
        let due = s.take_due();
        assert_eq!(due.len(), 1);
        assert_eq!(Some(due[0]), last);
        assert_eq!(s.cancelled(), 9);
        assert!(d.fire(due[0]));
        assert!(!d.is_pending());
    }

    #[test]
    fn stale_id_is_rejected() {
        let mut s = ManualFrameScheduler::new();
        let mut d = FrameDebouncer::new();
        let first = d.schedule(&mut s);
        let second = d.schedule(&mut s);
        assert!(!d.fire(first));
        assert!(d.fire(second));
        assert!(!d.fire(second), "a frame fires once");
    }

    #[test]
    fn cancel_clears_scheduler() {
        let mut s = ManualFrameScheduler::new();
        let mut d = FrameDebouncer::new();
        let id = d.schedule(&mut s);
        d.cancel(&mut s);
        assert!(!s.is_pending(id));
        assert!(d.pending().is_none());
        d.cancel(&mut s);
        assert_eq!(s.cancelled(), 1);
    }
}
