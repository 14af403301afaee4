#![forbid(unsafe_code)]

//! The navigation tour engine.
//!
//! [`NavigationTour`] is a controlled component: the host owns `is_open`,
//! the current step and the step list, and hands them over on every
//! [`sync`](NavigationTour::sync). The engine owns only derived state
//! (computed position, transition timers, listener set) and reports user
//! intent back as queued [`TourOutput`]s.
//!
//! # Host loop
//!
//! ```text
//! sync(props, host, now)          // after any prop change
//! handle_event(event, host)       // keydown / resize / scroll
//! on_frame(id, host)              // for each animation frame the host runs
//! tick(host, now)                 // when a timer deadline passes
//! render()                        // paint the returned frame
//! take_outputs(), take_subscription_diff()
//! ```
//!
//! # Invariants
//!
//! 1. At most one animation frame is outstanding; scroll/resize bursts
//!    collapse into one recompute per frame.
//! 2. Positions come from a fresh `bounding_client_rect()` each recompute.
//! 3. Closing or tearing down cancels the pending frame and drops every
//!    listener before returning.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Target not found | Selector matches nothing | No position, nothing rendered, warning in debug builds |
//! | Step without selector | Step has no anchor | No position, nothing rendered |
//! | Step index out of range | Host bug | `render()` returns `None` |

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, warn};
use wayfind_core::event::Event;
use wayfind_core::host::{ElementLocator, ScrollIntoViewOptions, TargetElement, ViewportSizeSource};
use wayfind_runtime::{
    FrameDebouncer, FrameId, FrameScheduler, Subscription, SubscriptionDiff, SubscriptionSet,
};

use crate::animation::{Direction, StepAnimator};
use crate::config::{TourConfig, TourConfigOverrides, TourTiming};
use crate::keyboard::{KeyAction, KeyboardController};
use crate::overlay::{ActionLabels, OverlayFrame, StepContent};
use crate::placement::{ComputedPosition, Placement};
use crate::step::TourStep;
use crate::visibility::{VisibilityController, VisibilityPhase};

/// Everything the engine needs from its environment.
pub trait TourHost: ViewportSizeSource + ElementLocator + FrameScheduler {}

impl<T> TourHost for T where T: ViewportSizeSource + ElementLocator + FrameScheduler + ?Sized {}

/// Host-owned tour state, passed on every sync.
#[derive(Debug, Clone, Copy)]
pub struct TourProps<'a> {
    pub is_open: bool,
    pub current_step: usize,
    pub steps: &'a [TourStep],
    pub config: TourConfigOverrides,
    pub class_name: &'a str,
}

impl<'a> TourProps<'a> {
    /// Closed tour on step 0.
    #[must_use]
    pub fn new(steps: &'a [TourStep]) -> Self {
        Self {
            is_open: false,
            current_step: 0,
            steps,
            config: TourConfigOverrides::default(),
            class_name: "",
        }
    }

    #[must_use]
    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    #[must_use]
    pub fn step(mut self, index: usize) -> Self {
        self.current_step = index;
        self
    }

    #[must_use]
    pub fn config(mut self, config: TourConfigOverrides) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: &'a str) -> Self {
        self.class_name = class_name;
        self
    }
}

/// Callbacks the host should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourOutput {
    Close,
    Next,
    Previous,
    /// The current step index changed (reported once per change).
    StepChanged(usize),
}

impl From<KeyAction> for TourOutput {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::Close => Self::Close,
            KeyAction::Next => Self::Next,
            KeyAction::Previous => Self::Previous,
        }
    }
}

/// Inputs that decide which element is tracked. A change re-resolves it.
#[derive(Debug, Clone, PartialEq)]
struct TargetKey {
    is_open: bool,
    selector: Option<String>,
    placement: Placement,
    config: TourConfig,
    current_step: usize,
}

#[derive(Debug)]
struct ActiveTarget<E> {
    element: E,
    selector: String,
    placement: Placement,
}

/// Positioned tooltip engine for one mounted tour.
#[derive(Debug)]
pub struct NavigationTour<E> {
    defaults: TourConfig,
    config: TourConfig,
    timing: TourTiming,
    labels: ActionLabels,
    is_open: bool,
    current_step: usize,
    steps: Vec<TourStep>,
    class_name: String,
    visibility: VisibilityController<OverlayFrame>,
    animator: StepAnimator,
    keyboard: KeyboardController,
    target_key: Option<TargetKey>,
    target: Option<ActiveTarget<E>>,
    debouncer: FrameDebouncer,
    position: Option<ComputedPosition>,
    subscriptions: SubscriptionSet,
    pending_diff: SubscriptionDiff,
    outputs: VecDeque<TourOutput>,
    recomputes: u64,
    /// False until the first sync after construction or teardown.
    synced: bool,
}

impl<E: TargetElement> Default for NavigationTour<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TargetElement> NavigationTour<E> {
    /// Engine with navigation-tour defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(TourConfig::navigation())
    }

    /// Engine whose unset props fall back to `defaults`.
    #[must_use]
    pub fn with_defaults(defaults: TourConfig) -> Self {
        let timing = TourTiming::default();
        Self {
            defaults,
            config: defaults,
            timing,
            labels: ActionLabels::default(),
            is_open: false,
            current_step: 0,
            steps: Vec::new(),
            class_name: String::new(),
            visibility: VisibilityController::new(timing.exit),
            animator: StepAnimator::new(0, timing),
            keyboard: KeyboardController::new(),
            target_key: None,
            target: None,
            debouncer: FrameDebouncer::new(),
            position: None,
            subscriptions: SubscriptionSet::new(),
            pending_diff: SubscriptionDiff::default(),
            outputs: VecDeque::new(),
            recomputes: 0,
            synced: false,
        }
    }

    #[must_use]
    pub fn timing(mut self, timing: TourTiming) -> Self {
        self.timing = timing;
        self.visibility = VisibilityController::new(timing.exit);
        self.animator = StepAnimator::new(self.current_step, timing);
        self
    }

    #[must_use]
    pub fn labels(mut self, labels: ActionLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Apply the host's current props.
    pub fn sync<H>(&mut self, props: &TourProps<'_>, host: &mut H, now: Duration)
    where
        H: TourHost + ElementLocator<Element = E> + ?Sized,
    {
        self.config = self.defaults.with_overrides(&props.config);
        if self.steps.as_slice() != props.steps {
            self.steps = props.steps.to_vec();
        }
        if self.class_name != props.class_name {
            self.class_name = props.class_name.to_string();
        }
        self.is_open = props.is_open;
        self.keyboard.set_open(props.is_open);
        self.visibility.set_open(props.is_open, now);

        self.current_step = props.current_step;
        if !self.synced {
            // Mount directly on the host's step: nothing changed yet.
            self.animator.reset(props.current_step);
            self.synced = true;
        } else if let Some(change) = self.animator.set_step(props.current_step, now) {
            self.outputs.push_back(TourOutput::StepChanged(change.index));
        }
        self.tick(host, now);
    }

    /// Advance timers and re-resolve the target if the displayed step moved.
    pub fn tick<H>(&mut self, host: &mut H, now: Duration)
    where
        H: TourHost + ElementLocator<Element = E> + ?Sized,
    {
        self.animator.tick(now);
        self.visibility.tick(now);
        self.resolve_target(host);
        self.reconcile_subscriptions();
    }

    /// Feed a window event. Returns `true` if the host should call
    /// `preventDefault()`.
    pub fn handle_event<H>(&mut self, event: &Event, host: &mut H) -> bool
    where
        H: FrameScheduler + ?Sized,
    {
        match event {
            Event::Key(key) => match self.keyboard.handle(key) {
                Some(outcome) => {
                    self.outputs.push_back(outcome.action.into());
                    outcome.prevent_default
                }
                None => false,
            },
            Event::Resize(_) | Event::Scroll => {
                if self.target.is_some() {
                    self.debouncer.schedule(host);
                }
                false
            }
        }
    }

    /// Run the deferred recompute for frame `id`. Returns `true` if the
    /// position was recomputed.
    pub fn on_frame<H>(&mut self, id: FrameId, host: &H) -> bool
    where
        H: ViewportSizeSource + ?Sized,
    {
        if !self.debouncer.fire(id) {
            return false;
        }
        let Some(target) = &self.target else {
            return false;
        };
        let rect = target.element.bounding_client_rect();
        let position = ComputedPosition::compute(
            &rect,
            target.placement,
            &self.config,
            host.viewport_size(),
        );
        self.recomputes += 1;
        debug!(
            selector = %target.selector,
            placement = position.tooltip.placement.as_str(),
            top = position.tooltip.top,
            left = position.tooltip.left,
            "tour position recomputed"
        );
        self.position = Some(position);
        true
    }

    /// The frame to paint, if anything is mounted.
    pub fn render(&mut self) -> Option<OverlayFrame> {
        match self.visibility.phase() {
            VisibilityPhase::Closed => None,
            VisibilityPhase::Closing => self.visibility.retained().cloned().map(OverlayFrame::hidden),
            VisibilityPhase::Opening | VisibilityPhase::Open => {
                let frame = self.build_frame()?;
                self.visibility.retain(frame.clone());
                self.visibility.mark_rendered();
                Some(frame)
            }
        }
    }

    /// Cancel the pending frame and drop every listener (unmount).
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: FrameScheduler + ?Sized,
    {
        self.debouncer.cancel(host);
        self.target = None;
        self.target_key = None;
        self.position = None;
        self.is_open = false;
        self.keyboard.set_open(false);
        self.visibility.reset();
        self.animator.reset(self.current_step);
        self.synced = false;
        let diff = self.subscriptions.clear();
        self.pending_diff.merge(diff);
        debug!("tour torn down");
    }

    /// Drain queued callbacks in order.
    pub fn take_outputs(&mut self) -> Vec<TourOutput> {
        self.outputs.drain(..).collect()
    }

    /// Listener changes since the last call.
    pub fn take_subscription_diff(&mut self) -> SubscriptionDiff {
        std::mem::take(&mut self.pending_diff)
    }

    #[must_use]
    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    #[must_use]
    pub fn position(&self) -> Option<&ComputedPosition> {
        self.position.as_ref()
    }

    /// How many times the position has been computed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    #[must_use]
    pub fn visibility(&self) -> VisibilityPhase {
        self.visibility.phase()
    }

    #[must_use]
    pub fn displayed_step(&self) -> usize {
        self.animator.displayed_index()
    }

    /// Direction of the most recent step change; `None` until the index
    /// first changes after mounting. Re-syncing an unchanged index keeps it.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.animator.direction()
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.animator.is_transitioning()
    }

    /// Config in effect after merging the last props.
    #[must_use]
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// The outstanding animation frame, if a recompute is queued.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.debouncer.pending()
    }

    /// Earliest time [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.animator.next_deadline(), self.visibility.exit_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn resolve_target<H>(&mut self, host: &mut H)
    where
        H: TourHost + ElementLocator<Element = E> + ?Sized,
    {
        let step = self.steps.get(self.animator.displayed_index());
        let key = TargetKey {
            is_open: self.is_open,
            selector: step.and_then(|s| s.target_selector.clone()),
            placement: step.map(TourStep::placement).unwrap_or_default(),
            config: self.config,
            current_step: self.current_step,
        };
        if self.target_key.as_ref() == Some(&key) {
            return;
        }

        self.debouncer.cancel(host);
        self.target = None;
        let (is_open, selector, placement) = (key.is_open, key.selector.clone(), key.placement);
        self.target_key = Some(key);

        let Some(selector) = selector.filter(|_| is_open) else {
            self.position = None;
            return;
        };
        let Some(element) = host.query_selector(&selector) else {
            if cfg!(debug_assertions) {
                warn!(selector = %selector, "tour target element not found");
            }
            self.position = None;
            return;
        };

        element.scroll_into_view(ScrollIntoViewOptions::instant_center());
        let frame = self.debouncer.schedule(host);
        debug!(selector = %selector, frame = frame.raw(), "tour target resolved");
        self.target = Some(ActiveTarget {
            element,
            selector,
            placement,
        });
    }

    fn reconcile_subscriptions(&mut self) {
        let window = self
            .target
            .is_some()
            .then_some([Subscription::Resize, Subscription::ScrollCapture]);
        let desired = self
            .keyboard
            .subscription()
            .into_iter()
            .chain(window.into_iter().flatten());
        let diff = self.subscriptions.reconcile(desired);
        self.pending_diff.merge(diff);
    }

    fn build_frame(&self) -> Option<OverlayFrame> {
        if self.current_step >= self.steps.len() {
            return None;
        }
        let step = self.steps.get(self.animator.displayed_index())?;
        let position = self.position.as_ref()?;
        let content = StepContent::new(
            step,
            self.current_step,
            self.steps.len(),
            &self.labels,
            self.animator.content_phase(),
        );
        Some(OverlayFrame::new(
            position,
            content,
            &self.config,
            &self.timing,
            &self.class_name,
            self.current_step,
        ))
    }
}
