#![forbid(unsafe_code)]

//! Mount/unmount timing around the exit animation.
//!
//! ```text
//! Closed --open--> Opening --rendered--> Open --close--> Closing --exit elapsed--> Closed
//!                     ^                                     |
//!                     +----------------open-----------------+
//! ```
//!
//! # Invariants
//!
//! 1. While `Closing`, the last content retained while open stays available
//!    so the exit animation has something to fade out.
//! 2. Reaching `Closed` drops the retained content and disarms the exit timer.

use std::time::Duration;

use tracing::debug;
use wayfind_runtime::OneShot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl VisibilityPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
        }
    }
}

/// Tracks whether the overlay is mounted and keeps content for the exit.
#[derive(Debug, Clone)]
pub struct VisibilityController<T> {
    phase: VisibilityPhase,
    exit_duration: Duration,
    exit: OneShot,
    retained: Option<T>,
}

impl<T> VisibilityController<T> {
    #[must_use]
    pub fn new(exit_duration: Duration) -> Self {
        Self {
            phase: VisibilityPhase::Closed,
            exit_duration,
            exit: OneShot::new(),
            retained: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> VisibilityPhase {
        self.phase
    }

    /// Whether anything should be mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.phase != VisibilityPhase::Closed
    }

    /// Apply the host's `is_open` flag. Returns `true` if the phase changed.
    pub fn set_open(&mut self, is_open: bool, now: Duration) -> bool {
        let next = match (self.phase, is_open) {
            (VisibilityPhase::Closed | VisibilityPhase::Closing, true) => {
                self.exit.cancel();
                VisibilityPhase::Opening
            }
            (VisibilityPhase::Opening | VisibilityPhase::Open, false) => {
                self.exit.start(now, self.exit_duration);
                VisibilityPhase::Closing
            }
            (phase, _) => phase,
        };
        self.transition(next)
    }

    /// Record that the opening frame was painted.
    pub fn mark_rendered(&mut self) {
        if self.phase == VisibilityPhase::Opening {
            self.transition(VisibilityPhase::Open);
        }
    }

    /// Keep `content` for a later exit animation. Ignored unless open.
    pub fn retain(&mut self, content: T) {
        if matches!(self.phase, VisibilityPhase::Opening | VisibilityPhase::Open) {
            self.retained = Some(content);
        }
    }

    /// Content kept from the last open frame.
    #[must_use]
    pub fn retained(&self) -> Option<&T> {
        self.retained.as_ref()
    }

    /// Finish the exit animation once its deadline passes.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.phase == VisibilityPhase::Closing && self.exit.fire_if_due(now) {
            self.retained = None;
            return self.transition(VisibilityPhase::Closed);
        }
        false
    }

    /// Unmount immediately, skipping the exit animation.
    pub fn reset(&mut self) {
        self.exit.cancel();
        self.retained = None;
        self.transition(VisibilityPhase::Closed);
    }

    /// When the exit animation ends, if one is running.
    #[must_use]
    pub fn exit_deadline(&self) -> Option<Duration> {
        self.exit.deadline()
    }

    fn transition(&mut self, next: VisibilityPhase) -> bool {
        if next == self.phase {
            return false;
        }
        debug!(from = self.phase.as_str(), to = next.as_str(), "tour visibility");
        self.phase = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn full_cycle() {
        let mut v = VisibilityController::new(ms(200));
        assert!(v.set_open(true, ms(0)));
        assert_eq!(v.phase(), VisibilityPhase::Opening);
        v.mark_rendered();
        assert_eq!(v.phase(), VisibilityPhase::Open);
        v.retain("step 1");

        assert!(v.set_open(false, ms(1000)));
        assert_eq!(v.phase(), VisibilityPhase::Closing);
        assert_eq!(v.retained(), Some(&"step 1"));
        assert!(!v.tick(ms(1199)));
        assert!(v.is_mounted());
        assert!(v.tick(ms(1200)));
        assert_eq!(v.phase(), VisibilityPhase::Closed);
        assert!(v.retained().is_none());
    }

    #[test]
    fn retain_ignored_while_closing() {
        let mut v = VisibilityController::new(ms(200));
        v.set_open(true, ms(0));
        v.retain(1);
        v.set_open(false, ms(10));
        v.retain(2);
        assert_eq!(v.retained(), Some(&1));
    }

    #[test]
    fn reopen_during_exit_cancels_timer() {
        let mut v: VisibilityController<()> = VisibilityController::new(ms(200));
        v.set_open(true, ms(0));
        v.set_open(false, ms(10));
        assert!(v.set_open(true, ms(50)));
        assert_eq!(v.phase(), VisibilityPhase::Opening);
        assert!(v.exit_deadline().is_none());
        assert!(!v.tick(ms(500)));
        assert!(v.is_mounted());
    }

    #[test]
    fn repeated_flags_are_noops() {
        let mut v: VisibilityController<()> = VisibilityController::new(ms(200));
        assert!(!v.set_open(false, ms(0)));
        v.set_open(true, ms(0));
        assert!(!v.set_open(true, ms(5)));
    }

    #[test]
    fn reset_skips_exit() {
        let mut v = VisibilityController::new(ms(200));
        v.set_open(true, ms(0));
        v.retain('x');
        v.set_open(false, ms(1));
        v.reset();
        assert!(!v.is_mounted());
        assert!(v.retained().is_none());
    }
}
