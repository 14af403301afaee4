//! String catalog with locale fallback and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: every lookup walks the chain exactly
//!    once, returning `None` if no locale provides the key.
//! 2. **Interpolation is single-pass**: `{name}` tokens are replaced once;
//!    substituted values are never re-scanned.
//! 3. **Nested dictionaries flatten to dotted keys**: `{"a": {"b": "x"}}`
//!    is stored as `a.b`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in any locale | `get` returns `None`, `translate` returns the key |
//! | Missing locale | Locale not loaded | Falls through chain |
//! | Bad interpolation arg | `{name}` but no `name` arg | Token left as-is |
//! | Non-string leaf in JSON | Number/bool/array in dictionary | `I18nError::ParseError` |

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Locale identifier (e.g., `"en"`, `"pt-BR"`, `"vi-VN"`).
pub type Locale = String;

/// Errors from i18n operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale tag was malformed.
    InvalidLocale(String),
    /// A dictionary could not be parsed.
    ParseError(String),
    /// Duplicate key in the same locale.
    DuplicateKey { locale: String, key: String },
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLocale(l) => write!(f, "invalid locale: {l}"),
            Self::ParseError(msg) => write!(f, "parse error: {msg}"),
            Self::DuplicateKey { locale, key } => {
                write!(f, "duplicate key '{key}' in locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// Check a BCP-47-ish tag: a 2–3 letter language, then optional
/// alphanumeric subtags of 2–8 characters separated by `-`.
pub fn validate_locale(tag: &str) -> Result<(), I18nError> {
    let mut parts = tag.split('-');
    let lang_ok = parts
        .next()
        .is_some_and(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_alphabetic()));
    let rest_ok = parts.all(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()));
    if lang_ok && rest_ok {
        Ok(())
    } else {
        Err(I18nError::InvalidLocale(tag.to_string()))
    }
}

/// Strings for a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    /// Create an empty locale string set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a string, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Parse a nested JSON dictionary, flattening objects into dotted keys.
    pub fn from_json_str(json: &str) -> Result<Self, I18nError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| I18nError::ParseError(e.to_string()))?;
        let mut strings = Self::new();
        flatten_into(&value, String::new(), &mut strings)?;
        Ok(strings)
    }

    /// Look up a string by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the locale has no strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all keys in this locale.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }
}

fn flatten_into(value: &Value, prefix: String, out: &mut LocaleStrings) -> Result<(), I18nError> {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_into(v, key, out)?;
            }
            Ok(())
        }
        Value::String(s) if !prefix.is_empty() => {
            out.insert(prefix, s.clone());
            Ok(())
        }
        other => Err(I18nError::ParseError(format!(
            "expected string or object at '{prefix}', found {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Central string catalog with locale fallback.
///
/// # Example
///
/// ```
/// use wayfind_i18n::{LocaleStrings, StringCatalog};
///
/// let mut catalog = StringCatalog::new();
/// let mut en = LocaleStrings::new();
/// en.insert("product_tour.actions.next", "Next");
/// en.insert("get_started.title", "Hey {name}, welcome aboard!");
/// catalog.add_locale("en", en).unwrap();
/// catalog.set_fallback_chain(vec!["en".into()]);
///
/// assert_eq!(catalog.get("fr", "product_tour.actions.next"), Some("Next"));
/// assert_eq!(
///     catalog.format("en", "get_started.title", &[("name", "Ada")]),
///     Some("Hey Ada, welcome aboard!".into())
/// );
/// assert_eq!(catalog.translate("en", "missing.key"), "missing.key");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: HashMap<Locale, LocaleStrings>,
    fallback_chain: Vec<Locale>,
}

impl StringCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add strings for a locale, merging into any strings already loaded.
    ///
    /// Merging rejects keys that the locale already defines.
    pub fn add_locale(
        &mut self,
        locale: impl Into<String>,
        strings: LocaleStrings,
    ) -> Result<(), I18nError> {
        let locale = locale.into();
        validate_locale(&locale)?;
        let existing = self.locales.entry(locale.clone()).or_default();
        if let Some(key) = strings.keys().find(|k| existing.get(k).is_some()) {
            return Err(I18nError::DuplicateKey {
                locale,
                key: key.to_string(),
            });
        }
        existing.strings.extend(strings.strings);
        Ok(())
    }

    /// Set the fallback chain (tried in order when a key is missing).
    ///
    /// Example: `["pt-BR", "pt", "en"]`.
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain;
    }

    /// Look up a string by key.
    ///
    /// Tries the specified locale, then its base language (`pt-BR` → `pt`),
    /// then walks the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        let base = locale.split('-').next().filter(|b| *b != locale);
        std::iter::once(locale)
            .chain(base)
            .chain(
                self.fallback_chain
                    .iter()
                    .map(String::as_str)
                    .filter(|fb| *fb != locale && Some(*fb) != base),
            )
            .find_map(|tag| self.locales.get(tag).and_then(|ls| ls.get(key)))
    }

    /// Look up a key, returning the key itself when no locale provides it.
    #[must_use]
    pub fn translate<'a>(&'a self, locale: &str, key: &'a str) -> Cow<'a, str> {
        match self.get(locale, key) {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Borrowed(key),
        }
    }

    /// Look up a string and perform `{name}` interpolation.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key).map(|template| interpolate(template, args))
    }

    /// All registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Keys from `reference_keys` that `locale` cannot resolve, even via fallback.
    #[must_use]
    pub fn missing_keys(&self, locale: &str, reference_keys: &[&str]) -> Vec<String> {
        let mut missing: Vec<String> = reference_keys
            .iter()
            .filter(|k| self.get(locale, k).is_none())
            .map(|k| (*k).to_string())
            .collect();
        missing.sort_unstable();
        missing
    }
}

/// Replace `{name}` tokens in a single pass.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match args.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> StringCatalog {
        let mut c = StringCatalog::new();
        let en = LocaleStrings::from_json_str(
            r#"{"product_tour":{"actions":{"next":"Next","back":"Back"},"title":"Tour {name}"}}"#,
        )
        .unwrap();
        c.add_locale("en", en).unwrap();
        let mut de = LocaleStrings::new();
        de.insert("product_tour.actions.next", "Weiter");
        c.add_locale("de", de).unwrap();
        c.set_fallback_chain(vec!["en".into()]);
        c
    }

    #[test]
    fn nested_json_flattens() {
        let c = catalog();
        assert_eq!(c.get("en", "product_tour.actions.back"), Some("Back"));
    }

    #[test]
    fn locale_then_fallback() {
        let c = catalog();
        assert_eq!(c.get("de", "product_tour.actions.next"), Some("Weiter"));
        assert_eq!(c.get("de", "product_tour.actions.back"), Some("Back"));
    }

    #[test]
    fn region_falls_back_to_base_language() {
        let c = catalog();
        assert_eq!(c.get("de-AT", "product_tour.actions.next"), Some("Weiter"));
    }

    #[test]
    fn translate_returns_key_when_missing() {
        let c = catalog();
        assert_eq!(c.translate("en", "nope.nothing"), "nope.nothing");
        assert!(c.get("en", "nope.nothing").is_none());
    }

    #[test]
    fn format_interpolates() {
        let c = catalog();
        assert_eq!(
            c.format("en", "product_tour.title", &[("name", "Cycles")]),
            Some("Tour Cycles".to_string())
        );
    }

    #[test]
    fn interpolate_leaves_unknown_and_unclosed_tokens() {
        assert_eq!(interpolate("a {x} b {y}", &[("x", "1")]), "a 1 b {y}");
        assert_eq!(interpolate("open {brace", &[]), "open {brace");
        assert_eq!(interpolate("{x}", &[("x", "{x}")]), "{x}");
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut c = catalog();
        let mut again = LocaleStrings::new();
        again.insert("product_tour.actions.next", "Next!");
        let err = c.add_locale("en", again).unwrap_err();
        assert_eq!(
            err,
            I18nError::DuplicateKey {
                locale: "en".into(),
                key: "product_tour.actions.next".into()
            }
        );
    }

    #[test]
    fn invalid_locale_rejected() {
        let mut c = StringCatalog::new();
        assert!(matches!(
            c.add_locale("english!", LocaleStrings::new()),
            Err(I18nError::InvalidLocale(_))
        ));
        assert!(validate_locale("pt-BR").is_ok());
        assert!(validate_locale("vi-VN").is_ok());
        assert!(validate_locale("x").is_err());
    }

    #[test]
    fn non_string_leaf_is_parse_error() {
        let err = LocaleStrings::from_json_str(r#"{"a":{"b":3}}"#).unwrap_err();
        assert!(matches!(err, I18nError::ParseError(msg) if msg.contains("a.b")));
    }

    #[test]
    fn missing_keys_sorted() {
        let c = catalog();
        let missing = c.missing_keys("de", &["z.key", "product_tour.actions.next", "a.key"]);
        assert_eq!(missing, vec!["a.key".to_string(), "z.key".to_string()]);
    }

    #[test]
    fn error_display() {
        assert_eq!(I18nError::InvalidLocale("x".into()).to_string(), "invalid locale: x");
    }
}
