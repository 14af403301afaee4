#![forbid(unsafe_code)]

//! Tooltip geometry and timing configuration.
//!
//! # Environment Variables
//! - `WAYFIND_TOUR_TOOLTIP_WIDTH` (px, > 0)
//! - `WAYFIND_TOUR_TOOLTIP_MAX_HEIGHT` (px, > 0)
//! - `WAYFIND_TOUR_POSITION_OFFSET` (px, >= 0)
//! - `WAYFIND_TOUR_ARROW_SIZE` (px, >= 0)
//! - `WAYFIND_TOUR_VIEWPORT_PADDING` (px, >= 0)

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const ENV_TOOLTIP_WIDTH: &str = "WAYFIND_TOUR_TOOLTIP_WIDTH";
const ENV_TOOLTIP_MAX_HEIGHT: &str = "WAYFIND_TOUR_TOOLTIP_MAX_HEIGHT";
const ENV_POSITION_OFFSET: &str = "WAYFIND_TOUR_POSITION_OFFSET";
const ENV_ARROW_SIZE: &str = "WAYFIND_TOUR_ARROW_SIZE";
const ENV_VIEWPORT_PADDING: &str = "WAYFIND_TOUR_VIEWPORT_PADDING";

/// Gap between target and tooltip for the navigation tour.
pub const NAVIGATION_POSITION_OFFSET: f64 = 40.0;
/// Gap between target and tooltip for the plain tour.
pub const BASE_POSITION_OFFSET: f64 = 16.0;

/// Tooltip geometry used by the placement engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourConfig {
    pub tooltip_width: f64,
    pub tooltip_max_height: f64,
    /// Gap between the target edge and the tooltip.
    pub position_offset: f64,
    pub arrow_size: f64,
    /// Minimum clearance from every viewport edge.
    pub viewport_padding: f64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self::navigation()
    }
}

impl TourConfig {
    /// Defaults for the navigation tour (offset 40).
    #[must_use]
    pub const fn navigation() -> Self {
        Self {
            tooltip_width: 320.0,
            tooltip_max_height: 400.0,
            position_offset: NAVIGATION_POSITION_OFFSET,
            arrow_size: 8.0,
            viewport_padding: 16.0,
        }
    }

    /// Defaults for the plain tour (offset 16).
    #[must_use]
    pub const fn base() -> Self {
        Self {
            position_offset: BASE_POSITION_OFFSET,
            ..Self::navigation()
        }
    }

    #[must_use]
    pub fn tooltip_width(mut self, px: f64) -> Self {
        self.tooltip_width = px;
        self
    }

    #[must_use]
    pub fn tooltip_max_height(mut self, px: f64) -> Self {
        self.tooltip_max_height = px;
        self
    }

    #[must_use]
    pub fn position_offset(mut self, px: f64) -> Self {
        self.position_offset = px;
        self
    }

    #[must_use]
    pub fn arrow_size(mut self, px: f64) -> Self {
        self.arrow_size = px;
        self
    }

    #[must_use]
    pub fn viewport_padding(mut self, px: f64) -> Self {
        self.viewport_padding = px;
        self
    }

    /// Layer caller-supplied overrides on top of these values.
    #[must_use]
    pub fn with_overrides(self, overrides: &TourConfigOverrides) -> Self {
        Self {
            tooltip_width: overrides.tooltip_width.unwrap_or(self.tooltip_width),
            tooltip_max_height: overrides
                .tooltip_max_height
                .unwrap_or(self.tooltip_max_height),
            position_offset: overrides.position_offset.unwrap_or(self.position_offset),
            arrow_size: overrides.arrow_size.unwrap_or(self.arrow_size),
            viewport_padding: overrides.viewport_padding.unwrap_or(self.viewport_padding),
        }
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> TourConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config through an arbitrary lookup, starting from the navigation defaults.
    pub fn from_env_with<F>(mut get: F) -> TourConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::navigation();
        let mut errors = Vec::new();

        let fields: [(&str, &'static str, &mut f64); 5] = [
            (ENV_TOOLTIP_WIDTH, "tooltip_width", &mut config.tooltip_width),
            (
                ENV_TOOLTIP_MAX_HEIGHT,
                "tooltip_max_height",
                &mut config.tooltip_max_height,
            ),
            (
                ENV_POSITION_OFFSET,
                "position_offset",
                &mut config.position_offset,
            ),
            (ENV_ARROW_SIZE, "arrow_size", &mut config.arrow_size),
            (
                ENV_VIEWPORT_PADDING,
                "viewport_padding",
                &mut config.viewport_padding,
            ),
        ];
        for (key, field, slot) in fields {
            if let Some(value) = get(key) {
                match parse_px(&value) {
                    Some(parsed) => *slot = parsed,
                    None => errors.push(TourConfigError::new(field, value, "expected pixels")),
                }
            }
        }

        if let Err(violations) = config.validate() {
            errors.extend(violations);
        }
        TourConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<TourConfigError>> {
        let mut errors = Vec::new();
        validate_positive("tooltip_width", self.tooltip_width, &mut errors);
        validate_positive("tooltip_max_height", self.tooltip_max_height, &mut errors);
        validate_non_negative("position_offset", self.position_offset, &mut errors);
        validate_non_negative("arrow_size", self.arrow_size, &mut errors);
        validate_non_negative("viewport_padding", self.viewport_padding, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial config supplied by the host; unset fields keep the defaults.
///
/// Deserializes from the camelCase shape hosts pass in
/// (`{"tooltipWidth": 360}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TourConfigOverrides {
    pub tooltip_width: Option<f64>,
    pub tooltip_max_height: Option<f64>,
    pub position_offset: Option<f64>,
    pub arrow_size: Option<f64>,
    pub viewport_padding: Option<f64>,
}

impl TourConfigOverrides {
    /// True when nothing is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct TourConfigParse {
    pub config: TourConfig,
    pub errors: Vec<TourConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl TourConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TourConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for TourConfigError {}

fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn validate_positive(field: &'static str, value: f64, errors: &mut Vec<TourConfigError>) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(TourConfigError::new(
            field,
            value.to_string(),
            "must be a finite value > 0",
        ));
    }
}

fn validate_non_negative(field: &'static str, value: f64, errors: &mut Vec<TourConfigError>) {
    if !value.is_finite() || value < 0.0 {
        errors.push(TourConfigError::new(
            field,
            value.to_string(),
            "must be a finite value >= 0",
        ));
    }
}

/// Durations driving the enter/exit and step-change animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourTiming {
    /// How long a closing tour stays mounted for its exit animation.
    pub exit: Duration,
    /// Length of a step transition.
    pub transition: Duration,
    /// Delay before the new step's content replaces the old one.
    pub content_swap: Duration,
    /// Fade-in of the new content once swapped.
    pub fade_in: Duration,
}

impl Default for TourTiming {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(200),
            transition: Duration::from_millis(250),
            content_swap: Duration::from_millis(100),
            fade_in: Duration::from_millis(150),
        }
    }
}

impl TourTiming {
    /// All durations zero; transitions settle on the next tick.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            exit: Duration::ZERO,
            transition: Duration::ZERO,
            content_swap: Duration::ZERO,
            fade_in: Duration::ZERO,
        }
    }
}
