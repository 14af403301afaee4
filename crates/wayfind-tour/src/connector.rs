#![forbid(unsafe_code)]

//! Anchoring dot and the line joining it to the tooltip.

use std::fmt;

use wayfind_core::geometry::{Coords, Rect};

use crate::placement::{ArrowPlacement, ESTIMATED_TOOLTIP_HEIGHT};

/// Dot diameter in pixels.
pub const DOT_SIZE: f64 = 8.0;
/// Vertical offset of the dot from the target's bottom edge.
pub const DOT_OFFSET: f64 = -4.0;

/// Dot straddling the target's bottom edge, centered horizontally.
#[must_use]
pub fn dot_position(target: &Rect) -> Coords {
    Coords::new(
        target.bottom() + DOT_OFFSET,
        target.center_x() - DOT_SIZE / 2.0,
    )
}

/// Vertical segment from the dot center to the near edge of the tooltip.
///
/// Formats as an SVG path (`M x y L x y`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorPath {
    pub x: f64,
    pub from_y: f64,
    pub to_y: f64,
}

impl ConnectorPath {
    /// True when the line runs upward to a tooltip above the dot.
    #[must_use]
    pub fn tooltip_above(&self) -> bool {
        self.to_y < self.from_y
    }

    /// Tooltip edge the line attaches to.
    #[must_use]
    pub fn arrow_placement(&self) -> ArrowPlacement {
        if self.tooltip_above() {
            ArrowPlacement::Bottom
        } else {
            ArrowPlacement::Top
        }
    }

    /// Length in pixels.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.to_y - self.from_y).abs()
    }
}

impl fmt::Display for ConnectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M {} {} L {} {}", self.x, self.from_y, self.x, self.to_y)
    }
}

/// Build the connector for a dot and tooltip origin.
///
/// A tooltip whose top lies above the dot center is treated as sitting above
/// the target, and the line ends at its estimated bottom edge.
#[must_use]
pub fn line_path(dot: Coords, tooltip: Coords) -> ConnectorPath {
    let x = dot.left + DOT_SIZE / 2.0;
    let from_y = dot.top + DOT_SIZE / 2.0;
    let to_y = if tooltip.top < from_y {
        tooltip.top + ESTIMATED_TOOLTIP_HEIGHT
    } else {
        tooltip.top
    };
    ConnectorPath { x, from_y, to_y }
}
