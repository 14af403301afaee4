#![forbid(unsafe_code)]

//! Browser binding for Wayfind tours.
//!
//! On `wasm32` this crate exports [`TourRunner`], a `wasm-bindgen` struct the
//! page drives from `requestAnimationFrame`. Everything that does not touch
//! the DOM lives in platform-independent modules so it runs under native
//! tests:
//!
//! - [`runner_core`]: prop/clock bookkeeping around `NavigationTour`.
//! - [`input`]: JSON-encoded window events to engine events.
//! - [`style`]: inline styles and attributes for the portal nodes.
//!
//! # Page contract
//!
//! ```text
//! const runner = new TourRunner();
//! runner.setSteps(JSON.stringify(steps));
//! runner.setOpen(true);
//! function frame(ts) {
//!   runner.setTime(ts);
//!   const { deadline } = runner.step();
//!   for (const out of runner.takeOutputs()) dispatch(out);
//!   syncListeners(runner.takeSubscriptionDiff());
//!   requestAnimationFrame(frame);
//! }
//! ```
//!
//! Listeners reported by `takeSubscriptionDiff` forward their events through
//! `pushEncodedInput`.

pub mod input;
pub mod runner_core;
pub mod style;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{DomElement, DomHost, DomPortal, TourRunner};

pub use input::{InputParseError, parse_encoded_input_to_event};
pub use runner_core::{RunnerCore, RunnerHost, StepResult, labels_from_json, output_kind};
pub use style::PaintPlan;
