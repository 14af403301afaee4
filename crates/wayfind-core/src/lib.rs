#![forbid(unsafe_code)]

//! Core: pixel geometry, input events, and host interfaces.
//!
//! # Role in Wayfind
//! `wayfind-core` is the boundary layer. It owns the value types every other
//! crate speaks (viewport rectangles, key events) and the traits through which
//! the engine reaches the host document.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Rect`], [`geometry::Coords`], [`geometry::Size`]
//!   in fractional viewport pixels.
//! - **Event**: canonical window events (keys, resize, scroll).
//! - **Host**: [`host::ViewportSizeSource`], [`host::ElementLocator`] and
//!   [`host::TargetElement`], so tests can supply deterministic fakes instead
//!   of a live DOM.
//!
//! # How it fits in the system
//! The runtime (`wayfind-runtime`) schedules frames and timers, and the tour
//! engine (`wayfind-tour`) consumes `Event` values and host rectangles. The
//! browser binding (`wayfind-web`) implements the host traits over `web-sys`.

pub mod event;
pub mod geometry;
pub mod host;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
