#![forbid(unsafe_code)]

//! Step-change direction and the content cross-fade window.
//!
//! After a step change the tooltip keeps showing the previous step's content
//! for `content_swap`, then fades the new content in until `transition`
//! elapses. A change arriving mid-transition restarts both timers, so rapid
//! `next()` calls never stack deadlines.

use std::time::Duration;

use tracing::debug;
use wayfind_runtime::OneShot;

use crate::config::TourTiming;
use crate::overlay::ContentPhase;

/// Which way the tour moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Direction of travel from `prev` to `next`; `None` when unchanged.
    #[must_use]
    pub fn between(prev: usize, next: usize) -> Option<Self> {
        match next.cmp(&prev) {
            std::cmp::Ordering::Greater => Some(Self::Next),
            std::cmp::Ordering::Less => Some(Self::Prev),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }
}

/// A step index change, reported once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChange {
    pub index: usize,
    pub direction: Direction,
}

/// Tracks the requested step, the step whose content is on screen, and the
/// transition timers between them.
#[derive(Debug, Clone)]
pub struct StepAnimator {
    current: usize,
    displayed: usize,
    direction: Option<Direction>,
    timing: TourTiming,
    transition: OneShot,
    content_swap: OneShot,
}

impl StepAnimator {
    #[must_use]
    pub fn new(initial: usize, timing: TourTiming) -> Self {
        Self {
            current: initial,
            displayed: initial,
            direction: None,
            timing,
            transition: OneShot::new(),
            content_swap: OneShot::new(),
        }
    }

    /// Move to `index`. Returns the change when the index differs.
    pub fn set_step(&mut self, index: usize, now: Duration) -> Option<StepChange> {
        let direction = Direction::between(self.current, index)?;
        debug!(
            from = self.current,
            to = index,
            direction = direction.as_str(),
            "tour step change"
        );
        self.current = index;
        self.direction = Some(direction);
        self.transition.start(now, self.timing.transition);
        self.content_swap.start(now, self.timing.content_swap);
        Some(StepChange { index, direction })
    }

    /// Advance timers. Returns `true` when the displayed step changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let before = self.displayed;
        if self.content_swap.fire_if_due(now) {
            self.displayed = self.current;
        }
        if self.transition.fire_if_due(now) {
            self.content_swap.cancel();
            self.displayed = self.current;
        }
        before != self.displayed
    }

    /// Jump straight to `index` with no transition.
    pub fn reset(&mut self, index: usize) {
        self.current = index;
        self.displayed = index;
        self.direction = None;
        self.transition.cancel();
        self.content_swap.cancel();
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Step whose content is on screen.
    #[must_use]
    pub fn displayed_index(&self) -> usize {
        self.displayed
    }

    /// Direction of the most recent change.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_armed()
    }

    /// True while the old content is still shown.
    #[must_use]
    pub fn is_content_transitioning(&self) -> bool {
        self.content_swap.is_armed()
    }

    #[must_use]
    pub fn content_phase(&self) -> ContentPhase {
        if self.is_content_transitioning() {
            ContentPhase::FadingOut
        } else if self.is_transitioning() {
            ContentPhase::FadingIn
        } else {
            ContentPhase::Steady
        }
    }

    #[must_use]
    pub fn timing(&self) -> &TourTiming {
        &self.timing
    }

    /// Earliest pending timer deadline, for hosts that sleep between ticks.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.content_swap.deadline(), self.transition.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
