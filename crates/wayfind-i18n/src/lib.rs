#![forbid(unsafe_code)]

//! Internationalization for tour copy.
//!
//! Provides externalized string storage with dotted-key lookup
//! (`product_tour.navigation.step_zero.title`), locale fallback chains,
//! and `{name}` interpolation.

pub mod catalog;

pub use catalog::{I18nError, Locale, LocaleStrings, StringCatalog};
