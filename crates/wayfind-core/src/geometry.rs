#![forbid(unsafe_code)]

//! Fractional pixel geometry in viewport coordinates.
//!
//! All values are CSS pixels relative to the top-left corner of the visible
//! window, matching what `getBoundingClientRect()` reports. Negative values
//! are legal: a target scrolled above the viewport has a negative `top`.

/// A point expressed as `{top, left}`, the shape fixed-position layers use.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coords {
    pub top: f64,
    pub left: f64,
}

impl Coords {
    /// Create a new coordinate pair.
    #[must_use]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Translate by the given deltas.
    #[must_use]
    pub fn offset(self, dy: f64, dx: f64) -> Self {
        Self {
            top: self.top + dy,
            left: self.left + dx,
        }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle, the equivalent of a DOM client rect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle from its four edges.
    ///
    /// Inverted edges produce a zero-sized rectangle anchored at `top/left`.
    #[must_use]
    pub fn from_edges(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal center.
    #[inline]
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical center.
    #[inline]
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Origin as `{top, left}`.
    #[must_use]
    pub fn origin(&self) -> Coords {
        Coords::new(self.top, self.left)
    }

    /// Size of the rectangle.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Move the rectangle by the given deltas (scrolling moves targets this way).
    #[must_use]
    pub fn translate(self, dy: f64, dx: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..self
        }
    }

    /// Whether `inner` lies entirely within `self`.
    #[must_use]
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.left >= self.left
            && inner.top >= self.top
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }
}
