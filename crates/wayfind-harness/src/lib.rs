#![forbid(unsafe_code)]

//! Test harness for Wayfind.
//!
//! - [`fake_dom`]: an in-memory document with live element rectangles,
//!   scrolling, and a manual animation-frame queue.
//! - [`determinism`]: seeded fixtures and JSONL logging for reproducible
//!   test output.

pub mod determinism;
pub mod fake_dom;

pub use determinism::{DeterminismFixture, TestJsonlLogger};
pub use fake_dom::{FakeDocument, FakeElement};
