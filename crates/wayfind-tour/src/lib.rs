#![forbid(unsafe_code)]

//! Positioned product-tour tooltips.
//!
//! A tour anchors a tooltip, a small dot and a connector line to live page
//! elements, one step at a time. This crate holds:
//!
//! - the placement engine ([`placement`], [`connector`]),
//! - the controllers that time visibility, step transitions and keys
//!   ([`visibility`], [`animation`], [`keyboard`]),
//! - the render model and the engine that drives it ([`overlay`],
//!   [`navigation_tour`]),
//! - host-side session state, completion persistence and the built-in
//!   tours ([`session`], [`completion`], [`catalog`]).
//!
//! # Example
//!
//! ```
//! use wayfind_core::geometry::{Rect, Size};
//! use wayfind_tour::{Placement, TourConfig, compute_best_position};
//!
//! let target = Rect::from_edges(100.0, 100.0, 300.0, 140.0);
//! let pos = compute_best_position(
//!     &target,
//!     Placement::BottomCenter,
//!     &TourConfig::navigation(),
//!     Size::new(1280.0, 800.0),
//! );
//! assert_eq!((pos.top, pos.left), (180.0, 40.0));
//! ```

pub mod animation;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod connector;
pub mod keyboard;
pub mod navigation_tour;
pub mod overlay;
pub mod placement;
pub mod session;
pub mod step;
pub mod visibility;

pub use animation::{Direction, StepAnimator, StepChange};
pub use catalog::{BuiltinTour, Theme, action_labels, english_catalog};
pub use completion::{
    CompletionDocument, CompletionStore, JsonFileCompletionStore, MemoryCompletionStore,
    StorageTarget, StoreError,
};
pub use config::{TourConfig, TourConfigError, TourConfigOverrides, TourConfigParse, TourTiming};
pub use connector::{ConnectorPath, DOT_OFFSET, DOT_SIZE, dot_position, line_path};
pub use keyboard::{KeyAction, KeyOutcome, KeyboardController};
pub use navigation_tour::{NavigationTour, TourHost, TourOutput, TourProps};
pub use overlay::{ActionLabels, ContentPhase, OverlayFrame, StepContent};
pub use placement::{
    ArrowPlacement, ComputedPosition, ESTIMATED_TOOLTIP_HEIGHT, ParsePlacementError, Placement,
    Side, TooltipPosition, compute_best_position, coordinates_for, fits_viewport,
};
pub use session::{TourEvent, TourSession};
pub use step::TourStep;
pub use visibility::{VisibilityController, VisibilityPhase};
