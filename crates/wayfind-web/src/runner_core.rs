#![forbid(unsafe_code)]

//! Platform-independent runner wrapping [`NavigationTour`].
//!
//! The page's JS glue owns the animation loop. Each `requestAnimationFrame`
//! callback advances the clock and calls [`RunnerCore::step`], which first
//! runs the frames the engine requested during the previous step, then
//! applies pending prop changes and timers, then renders. No JS/WASM types
//! here, so the runner is tested natively against a fake document.

use std::time::Duration;

use serde::Deserialize;
use wayfind_core::host::ElementLocator;
use wayfind_runtime::{FrameId, SubscriptionDiff};
use wayfind_tour::{
    ActionLabels, NavigationTour, OverlayFrame, TourConfigOverrides, TourHost, TourOutput,
    TourProps, TourStep,
};

use crate::input::{InputParseError, parse_encoded_input_to_event};

/// A [`TourHost`] whose frame requests are drained by the runner.
pub trait RunnerHost: TourHost {
    /// Frames requested since the last call, in request order.
    fn take_due_frames(&mut self) -> Vec<FrameId>;
}

/// What one [`RunnerCore::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Frames that produced a position recompute.
    pub recomputed: usize,
    /// The frame to paint, or `None` to clear the portal.
    pub frame: Option<OverlayFrame>,
}

/// JS-facing name for an output.
#[must_use]
pub fn output_kind(output: TourOutput) -> &'static str {
    match output {
        TourOutput::Close => "close",
        TourOutput::Next => "next",
        TourOutput::Previous => "previous",
        TourOutput::StepChanged(_) => "stepChange",
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLabels {
    close: Option<String>,
    next: Option<String>,
    back: Option<String>,
    done: Option<String>,
}

/// Button captions from `{"close":..,"next":..,"back":..,"done":..}`.
/// Missing keys keep the English defaults. Anything but a JSON object is
/// rejected.
pub fn labels_from_json(json: &str) -> Result<ActionLabels, serde_json::Error> {
    // Derived struct impls also accept arrays; go through a map first.
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    let raw: RawLabels = serde_json::from_value(serde_json::Value::Object(object))?;
    let defaults = ActionLabels::default();
    Ok(ActionLabels {
        close: raw.close.unwrap_or(defaults.close),
        next: raw.next.unwrap_or(defaults.next),
        back: raw.back.unwrap_or(defaults.back),
        done: raw.done.unwrap_or(defaults.done),
    })
}

/// Whole microseconds, so deadlines built from the same inputs compare equal.
fn millis(ms: f64) -> Duration {
    Duration::from_micros((ms.max(0.0) * 1000.0).round() as u64)
}

/// Host-driven tour runner.
pub struct RunnerCore<H: RunnerHost> {
    host: H,
    tour: NavigationTour<<H as ElementLocator>::Element>,
    steps: Vec<TourStep>,
    is_open: bool,
    current_step: usize,
    config: TourConfigOverrides,
    class_name: String,
    now: Duration,
    props_dirty: bool,
}

impl<H: RunnerHost> RunnerCore<H> {
    pub fn new(host: H, labels: ActionLabels) -> Self {
        Self {
            host,
            tour: NavigationTour::new().labels(labels),
            steps: Vec::new(),
            is_open: false,
            current_step: 0,
            config: TourConfigOverrides::default(),
            class_name: String::new(),
            now: Duration::ZERO,
            props_dirty: true,
        }
    }

    /// Replace the steps from a JSON array. Returns the step count.
    pub fn set_steps_json(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        self.steps = serde_json::from_str(json)?;
        self.props_dirty = true;
        Ok(self.steps.len())
    }

    /// Replace the config overrides from a JSON object (`{"tooltipWidth":360}`).
    pub fn set_config_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.config = serde_json::from_str(json)?;
        self.props_dirty = true;
        Ok(())
    }

    pub fn set_open(&mut self, is_open: bool) {
        self.props_dirty |= self.is_open != is_open;
        self.is_open = is_open;
    }

    pub fn set_current_step(&mut self, index: usize) {
        self.props_dirty |= self.current_step != index;
        self.current_step = index;
    }

    pub fn set_class_name(&mut self, class_name: String) {
        self.props_dirty |= self.class_name != class_name;
        self.class_name = class_name;
    }

    /// Advance the clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        self.now += millis(dt_ms);
    }

    /// Set the clock to an absolute `performance.now()` value. The clock
    /// never runs backwards.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        self.now = self.now.max(millis(ts_ms));
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Feed one encoded window event. Returns `true` if the page should call
    /// `preventDefault()`; unknown kinds are ignored.
    pub fn push_encoded_input(&mut self, json: &str) -> Result<bool, InputParseError> {
        let Some(event) = parse_encoded_input_to_event(json)? else {
            return Ok(false);
        };
        Ok(self.tour.handle_event(&event, &mut self.host))
    }

    /// Run last step's frames, apply props and timers, then render.
    pub fn step(&mut self) -> StepResult {
        let recomputed = self
            .host
            .take_due_frames()
            .into_iter()
            .filter(|id| self.tour.on_frame(*id, &self.host))
            .count();

        if self.props_dirty {
            self.props_dirty = false;
            let props = TourProps::new(&self.steps)
                .open(self.is_open)
                .step(self.current_step)
                .config(self.config)
                .class_name(&self.class_name);
            self.tour.sync(&props, &mut self.host, self.now);
        } else {
            self.tour.tick(&mut self.host, self.now);
        }

        StepResult {
            recomputed,
            frame: self.tour.render(),
        }
    }

    /// Callbacks for the page, in order.
    pub fn take_outputs(&mut self) -> Vec<TourOutput> {
        self.tour.take_outputs()
    }

    /// Listeners to attach and detach.
    pub fn take_subscription_diff(&mut self) -> SubscriptionDiff {
        self.tour.take_subscription_diff()
    }

    /// Earliest time a step has timer work, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tour.next_deadline()
    }

    /// Cancel pending work and drop every listener.
    pub fn teardown(&mut self) {
        self.tour.teardown(&mut self.host);
        self.is_open = false;
        self.props_dirty = false;
    }

    #[must_use]
    pub fn tour(&self) -> &NavigationTour<<H as ElementLocator>::Element> {
        &self.tour
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
