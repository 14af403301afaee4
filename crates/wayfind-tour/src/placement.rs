#![forbid(unsafe_code)]

//! Tooltip placement with viewport-fit fallback.
//!
//! The engine computes fixed-position coordinates for a tooltip of width
//! `tooltip_width` next to a target rectangle. The tooltip's real height is
//! unknown before layout, so every fit test uses
//! [`ESTIMATED_TOOLTIP_HEIGHT`].
//!
//! # Invariants
//!
//! 1. Every placement's fallback list starts with the placement itself.
//! 2. The first candidate that fits the padded viewport wins; if none fits,
//!    the preferred placement's raw coordinates are returned.
//! 3. Results are a pure function of `(target, preference, config, viewport)`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown placement name | Bad step data | [`Placement::normalize`] yields `BottomCenter` |
//! | Viewport too small | Nothing fits | Preferred coordinates, possibly off-screen |

use std::fmt;
use std::str::FromStr;

use wayfind_core::geometry::{Coords, Rect, Size};

use crate::config::TourConfig;
use crate::connector::{ConnectorPath, dot_position, line_path};

/// Height assumed for fit tests before the tooltip has been laid out.
pub const ESTIMATED_TOOLTIP_HEIGHT: f64 = 200.0;

/// Side of the target the tooltip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Where the tooltip sits relative to its target: a side plus an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    TopLeft,
    TopRight,
    TopCenter,
    BottomLeft,
    BottomRight,
    #[default]
    BottomCenter,
    LeftTop,
    LeftBottom,
    LeftCenter,
    RightTop,
    RightBottom,
    RightCenter,
}

impl Placement {
    pub const ALL: [Placement; 12] = [
        Self::TopLeft,
        Self::TopRight,
        Self::TopCenter,
        Self::BottomLeft,
        Self::BottomRight,
        Self::BottomCenter,
        Self::LeftTop,
        Self::LeftBottom,
        Self::LeftCenter,
        Self::RightTop,
        Self::RightBottom,
        Self::RightCenter,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::TopCenter => "top-center",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::BottomCenter => "bottom-center",
            Self::LeftTop => "left-top",
            Self::LeftBottom => "left-bottom",
            Self::LeftCenter => "left-center",
            Self::RightTop => "right-top",
            Self::RightBottom => "right-bottom",
            Self::RightCenter => "right-center",
        }
    }

    /// Parse a placement name, falling back to `bottom-center` for anything
    /// missing or unrecognized.
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::TopLeft | Self::TopRight | Self::TopCenter => Side::Top,
            Self::BottomLeft | Self::BottomRight | Self::BottomCenter => Side::Bottom,
            Self::LeftTop | Self::LeftBottom | Self::LeftCenter => Side::Left,
            Self::RightTop | Self::RightBottom | Self::RightCenter => Side::Right,
        }
    }

    /// Candidates tried in order, starting with `self`.
    #[must_use]
    pub const fn fallbacks(self) -> [Placement; 4] {
        use Placement::*;
        match self {
            BottomCenter => [BottomCenter, TopCenter, RightCenter, LeftCenter],
            TopCenter => [TopCenter, BottomCenter, RightCenter, LeftCenter],
            LeftCenter => [LeftCenter, RightCenter, BottomCenter, TopCenter],
            RightCenter => [RightCenter, LeftCenter, BottomCenter, TopCenter],
            BottomLeft => [BottomLeft, BottomCenter, TopLeft, TopCenter],
            BottomRight => [BottomRight, BottomCenter, TopRight, TopCenter],
            TopLeft => [TopLeft, TopCenter, BottomLeft, BottomCenter],
            TopRight => [TopRight, TopCenter, BottomRight, BottomCenter],
            LeftTop => [LeftTop, LeftCenter, RightTop, RightCenter],
            LeftBottom => [LeftBottom, LeftCenter, RightBottom, RightCenter],
            RightTop => [RightTop, RightCenter, LeftTop, LeftCenter],
            RightBottom => [RightBottom, RightCenter, LeftBottom, LeftCenter],
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized placement name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlacementError {
    pub input: String,
}

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tooltip placement: {:?}", self.input)
    }
}

impl std::error::Error for ParsePlacementError {}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePlacementError {
                input: s.to_string(),
            })
    }
}

/// Edge of the tooltip that faces the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowPlacement {
    Top,
    Bottom,
    Left,
    Right,
}

impl ArrowPlacement {
    #[must_use]
    pub const fn for_side(side: Side) -> Self {
        match side {
            Side::Top => Self::Bottom,
            Side::Bottom => Self::Top,
            Side::Left => Self::Right,
            Side::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Resolved tooltip coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPosition {
    pub top: f64,
    pub left: f64,
    /// Placement actually used after the fallback search.
    pub placement: Placement,
    pub arrow_placement: ArrowPlacement,
    pub arrow_offset: f64,
}

impl TooltipPosition {
    #[must_use]
    pub fn coords(&self) -> Coords {
        Coords::new(self.top, self.left)
    }
}

/// Raw coordinates for one placement, before any fit test.
#[must_use]
pub fn coordinates_for(placement: Placement, target: &Rect, config: &TourConfig) -> Coords {
    let w = config.tooltip_width;
    let h = ESTIMATED_TOOLTIP_HEIGHT;
    let offset = config.position_offset;
    let centered_left = target.center_x() - w / 2.0;
    let centered_top = target.center_y() - h / 2.0;

    let (top, left) = match placement {
        Placement::BottomCenter => (target.bottom() + offset, centered_left),
        Placement::BottomLeft => (target.bottom() + offset, target.left),
        Placement::BottomRight => (target.bottom() + offset, target.right() - w),
        Placement::TopCenter => (target.top - h - offset, centered_left),
        Placement::TopLeft => (target.top - h - offset, target.left),
        Placement::TopRight => (target.top - h - offset, target.right() - w),
        Placement::RightCenter => (centered_top, target.right() + offset),
        Placement::RightTop => (target.top, target.right() + offset),
        Placement::RightBottom => (target.bottom() - h, target.right() + offset),
        Placement::LeftCenter => (centered_top, target.left - w - offset),
        Placement::LeftTop => (target.top, target.left - w - offset),
        Placement::LeftBottom => (target.bottom() - h, target.left - w - offset),
    };
    Coords::new(top, left)
}

/// Whether a tooltip at `coords` keeps `viewport_padding` clear of every edge.
#[must_use]
pub fn fits_viewport(coords: Coords, config: &TourConfig, viewport: Size) -> bool {
    let pad = config.viewport_padding;
    let fits_horizontally =
        coords.left >= pad && coords.left + config.tooltip_width <= viewport.width - pad;
    let fits_vertically =
        coords.top >= pad && coords.top + ESTIMATED_TOOLTIP_HEIGHT <= viewport.height - pad;
    fits_horizontally && fits_vertically
}

/// Pick the first placement in `preference`'s fallback list that fits.
#[must_use]
pub fn compute_best_position(
    target: &Rect,
    preference: Placement,
    config: &TourConfig,
    viewport: Size,
) -> TooltipPosition {
    let resolved = preference
        .fallbacks()
        .into_iter()
        .map(|placement| (placement, coordinates_for(placement, target, config)))
        .find(|(_, coords)| fits_viewport(*coords, config, viewport));

    let (placement, coords) =
        resolved.unwrap_or_else(|| (preference, coordinates_for(preference, target, config)));
    TooltipPosition {
        top: coords.top,
        left: coords.left,
        placement,
        arrow_placement: ArrowPlacement::for_side(placement.side()),
        arrow_offset: 0.0,
    }
}

/// Everything needed to paint one step: tooltip and anchoring dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedPosition {
    pub tooltip: TooltipPosition,
    pub dot: Coords,
}

impl ComputedPosition {
    /// Place the tooltip and dot for a live target rectangle.
    #[must_use]
    pub fn compute(
        target: &Rect,
        preference: Placement,
        config: &TourConfig,
        viewport: Size,
    ) -> Self {
        Self {
            tooltip: compute_best_position(target, preference, config, viewport),
            dot: dot_position(target),
        }
    }

    /// Line from the dot to the tooltip.
    #[must_use]
    pub fn connector(&self) -> ConnectorPath {
        line_path(self.dot, self.tooltip.coords())
    }
}
