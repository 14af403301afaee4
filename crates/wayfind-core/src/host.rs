#![forbid(unsafe_code)]

//! Host interfaces the engine queries instead of touching globals.
//!
//! # Invariants
//!
//! 1. [`TargetElement::bounding_client_rect`] reads live geometry; callers
//!    never cache its result across scroll or resize events.
//! 2. Lookups are synchronous and side-effect free, except
//!    [`TargetElement::scroll_into_view`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Selector matches nothing | Element not mounted yet | `query_selector` returns `None` |
//! | Invalid selector syntax | Host rejects the selector | `query_selector` returns `None` |

use crate::geometry::{Rect, Size};

/// Supplies the current viewport size (`innerWidth` × `innerHeight`).
pub trait ViewportSizeSource {
    fn viewport_size(&self) -> Size;
}

/// Resolves a CSS selector to a live element.
pub trait ElementLocator {
    type Element: TargetElement;

    fn query_selector(&self, selector: &str) -> Option<Self::Element>;
}

/// A live element the tooltip anchors to.
pub trait TargetElement {
    /// Current bounding rectangle in viewport pixels.
    fn bounding_client_rect(&self) -> Rect;

    /// Scroll ancestors so the element becomes visible.
    fn scroll_into_view(&self, options: ScrollIntoViewOptions);
}

impl<T: ViewportSizeSource + ?Sized> ViewportSizeSource for &T {
    fn viewport_size(&self) -> Size {
        (**self).viewport_size()
    }
}

impl<T: ViewportSizeSource + ?Sized> ViewportSizeSource for &mut T {
    fn viewport_size(&self) -> Size {
        (**self).viewport_size()
    }
}

/// A fixed viewport, handy when the size is already known.
impl ViewportSizeSource for Size {
    fn viewport_size(&self) -> Size {
        *self
    }
}

/// How the scroll is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump immediately.
    #[default]
    Auto,
    Smooth,
}

/// Alignment of the element inside the scroll container on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

impl ScrollAlign {
    /// DOM `ScrollLogicalPosition` keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
            Self::Nearest => "nearest",
        }
    }
}

/// Options for [`TargetElement::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollIntoViewOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollAlign,
    pub inline: ScrollAlign,
}

impl ScrollIntoViewOptions {
    /// Instant scroll that centers the element on both axes.
    #[must_use]
    pub const fn instant_center() -> Self {
        Self {
            behavior: ScrollBehavior::Auto,
            block: ScrollAlign::Center,
            inline: ScrollAlign::Center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_size_is_a_viewport() {
        let size = Size::new(1280.0, 800.0);
        assert_eq!(size.viewport_size(), size);
        let by_ref = &size;
        assert_eq!(by_ref.viewport_size(), size);
    }

    #[test]
    fn instant_center_is_the_default() {
        assert_eq!(
            ScrollIntoViewOptions::instant_center(),
            ScrollIntoViewOptions::default()
        );
        assert_eq!(ScrollAlign::Center.as_str(), "center");
    }
}
