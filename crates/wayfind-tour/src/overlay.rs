#![forbid(unsafe_code)]

//! Render model for the portal layer.
//!
//! A frame describes three fixed-position layers (tooltip, connector SVG,
//! dot) plus the step content. Layer opacity and scale follow `visible`,
//! which is true exactly when a computed position exists.

use std::time::Duration;

use crate::config::{TourConfig, TourTiming};
use crate::connector::{ConnectorPath, DOT_SIZE};
use crate::placement::{ArrowPlacement, ComputedPosition};
use crate::step::TourStep;

pub const TOOLTIP_Z_INDEX: i32 = 9999;
pub const CONNECTOR_Z_INDEX: i32 = 9998;
pub const DOT_Z_INDEX: i32 = 9999;
/// Stroke dash length used to draw the connector in.
pub const CONNECTOR_DASH: f64 = 1000.0;
/// Connector opacity while shown.
pub const CONNECTOR_OPACITY: f64 = 0.3;
/// Tooltip scale while hidden.
pub const TOOLTIP_HIDDEN_SCALE: f64 = 0.95;

/// Element id of the tooltip title, referenced by `aria-labelledby`.
pub const TITLE_ID: &str = "navigation-tour-title";
/// Element id of the tooltip body, referenced by `aria-describedby`.
pub const DESCRIPTION_ID: &str = "navigation-tour-description";

/// Opacity phase of the tooltip content during a step change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentPhase {
    /// Old content fading out before the swap.
    FadingOut,
    /// New content fading in.
    FadingIn,
    #[default]
    Steady,
}

impl ContentPhase {
    #[must_use]
    pub const fn opacity(self) -> f64 {
        match self {
            Self::FadingOut => 0.0,
            Self::FadingIn | Self::Steady => 1.0,
        }
    }

    /// CSS transition length for this phase.
    #[must_use]
    pub fn duration(self, timing: &TourTiming) -> Duration {
        match self {
            Self::FadingOut => timing.content_swap,
            Self::FadingIn => timing.fade_in,
            Self::Steady => Duration::ZERO,
        }
    }
}

/// Button captions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLabels {
    pub close: String,
    pub next: String,
    pub back: String,
    pub done: String,
}

impl Default for ActionLabels {
    fn default() -> Self {
        Self {
            close: "Close".into(),
            next: "Next".into(),
            back: "Back".into(),
            done: "Done".into(),
        }
    }
}

/// Text and controls inside the tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct StepContent {
    pub step_id: String,
    pub title: String,
    pub description: String,
    pub asset: Option<String>,
    /// One-based position of the current step.
    pub step_number: usize,
    pub total_steps: usize,
    pub is_first: bool,
    pub is_last: bool,
    /// Back is hidden on the first step.
    pub show_back: bool,
    pub back_label: String,
    /// "Done" on the last step, "Next" otherwise.
    pub next_label: String,
    pub close_label: String,
    pub phase: ContentPhase,
}

impl StepContent {
    /// Content for `step` while the tour sits on `current_step`.
    ///
    /// `step` is the displayed step, which lags `current_step` during the
    /// content swap; the counter and buttons follow `current_step`.
    #[must_use]
    pub fn new(
        step: &TourStep,
        current_step: usize,
        total_steps: usize,
        labels: &ActionLabels,
        phase: ContentPhase,
    ) -> Self {
        let is_first = current_step == 0;
        let is_last = current_step + 1 == total_steps;
        Self {
            step_id: step.id.clone(),
            title: step.title.clone(),
            description: step.description.clone(),
            asset: step.asset.clone(),
            step_number: current_step + 1,
            total_steps,
            is_first,
            is_last,
            show_back: !is_first,
            back_label: labels.back.clone(),
            next_label: if is_last {
                labels.done.clone()
            } else {
                labels.next.clone()
            },
            close_label: labels.close.clone(),
            phase,
        }
    }

    /// Progress text such as `"2 of 5"`.
    #[must_use]
    pub fn counter(&self) -> String {
        format!("{} of {}", self.step_number, self.total_steps)
    }
}

/// The dialog box.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipLayer {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub max_height: f64,
    pub z_index: i32,
    pub opacity: f64,
    pub scale: f64,
    pub arrow_placement: ArrowPlacement,
    pub role: &'static str,
    pub aria_modal: bool,
    pub labelled_by: &'static str,
    pub described_by: &'static str,
    /// Extra class supplied by the host.
    pub class_name: String,
}

/// Full-viewport SVG holding the connector path.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorLayer {
    pub path: ConnectorPath,
    pub z_index: i32,
    pub opacity: f64,
    pub dash_array: f64,
    pub dash_offset: f64,
}

/// The anchoring dot.
#[derive(Debug, Clone, PartialEq)]
pub struct DotLayer {
    pub top: f64,
    pub left: f64,
    pub size: f64,
    pub z_index: i32,
    pub opacity: f64,
    pub scale: f64,
}

/// One paintable overlay state.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    /// Current step index; hosts remount layers when it changes.
    pub step_key: usize,
    pub tooltip: TooltipLayer,
    pub connector: ConnectorLayer,
    pub dot: DotLayer,
    pub content: StepContent,
    pub visible: bool,
    /// Length of layer enter/exit transitions.
    pub transition: Duration,
}

impl OverlayFrame {
    /// A visible frame for a computed position.
    #[must_use]
    pub fn new(
        position: &ComputedPosition,
        content: StepContent,
        config: &TourConfig,
        timing: &TourTiming,
        class_name: &str,
        step_key: usize,
    ) -> Self {
        Self {
            step_key,
            tooltip: TooltipLayer {
                top: position.tooltip.top,
                left: position.tooltip.left,
                width: config.tooltip_width,
                max_height: config.tooltip_max_height,
                z_index: TOOLTIP_Z_INDEX,
                opacity: 1.0,
                scale: 1.0,
                arrow_placement: position.connector().arrow_placement(),
                role: "dialog",
                aria_modal: true,
                labelled_by: TITLE_ID,
                described_by: DESCRIPTION_ID,
                class_name: class_name.to_string(),
            },
            connector: ConnectorLayer {
                path: position.connector(),
                z_index: CONNECTOR_Z_INDEX,
                opacity: CONNECTOR_OPACITY,
                dash_array: CONNECTOR_DASH,
                dash_offset: 0.0,
            },
            dot: DotLayer {
                top: position.dot.top,
                left: position.dot.left,
                size: DOT_SIZE,
                z_index: DOT_Z_INDEX,
                opacity: 1.0,
                scale: 1.0,
            },
            content,
            visible: true,
            transition: timing.transition,
        }
    }

    /// The same frame with every layer in its hidden state.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self.tooltip.opacity = 0.0;
        self.tooltip.scale = TOOLTIP_HIDDEN_SCALE;
        self.connector.opacity = 0.0;
        self.connector.dash_offset = CONNECTOR_DASH;
        self.dot.opacity = 0.0;
        self.dot.scale = 0.0;
        self
    }
}
