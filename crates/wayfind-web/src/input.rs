#![forbid(unsafe_code)]

//! JSON input parser for window events forwarded by the page.
//!
//! The JS glue serializes each DOM event it listens for into a small JSON
//! object and hands it to [`parse_encoded_input_to_event`]:
//!
//! ```text
//! {"kind":"key","phase":"down","code":"ArrowRight","mods":0,"repeat":false}
//! {"kind":"resize","width":1280,"height":800}
//! {"kind":"scroll"}
//! ```
//!
//! `code` is the DOM `KeyboardEvent.key` value. `mods` uses the bit layout
//! of [`Modifiers`] (shift=1, ctrl=2, alt=4, meta=8). Kinds the engine does
//! not listen to return `Ok(None)`.

use serde::Deserialize;
use wayfind_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
use wayfind_core::geometry::Size;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown key phase value.
    UnknownPhase(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownPhase(phase) => write!(f, "unknown phase: {phase}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    mods: Option<u8>,
    #[serde(default)]
    repeat: Option<bool>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

/// Parse one encoded window event.
pub fn parse_encoded_input_to_event(json: &str) -> Result<Option<Event>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "key" => parse_key_event(&raw).map(Some),
        "resize" => parse_resize_event(&raw).map(Some),
        "scroll" => Ok(Some(Event::Scroll)),
        _ => Ok(None),
    }
}

fn parse_key_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let kind = match raw.phase.as_deref().unwrap_or("down") {
        "down" if raw.repeat.unwrap_or(false) => KeyEventKind::Repeat,
        "down" => KeyEventKind::Press,
        "up" => KeyEventKind::Release,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };
    let code = raw
        .code
        .as_deref()
        .ok_or(InputParseError::MissingField("code"))?;

    Ok(Event::Key(KeyEvent {
        code: KeyCode::from_dom_key(code),
        modifiers: Modifiers::from_bits_truncate(raw.mods.unwrap_or(0)),
        kind,
    }))
}

fn parse_resize_event(raw: &RawInput) -> Result<Event, InputParseError> {
    let width = raw.width.ok_or(InputParseError::MissingField("width"))?;
    let height = raw.height.ok_or(InputParseError::MissingField("height"))?;
    Ok(Event::Resize(Size::new(width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<Event> {
        parse_encoded_input_to_event(json).unwrap()
    }

    #[test]
    fn arrow_keys() {
        let ev = parse(r#"{"kind":"key","phase":"down","code":"ArrowRight","mods":0}"#);
        assert_eq!(ev, Some(Event::Key(KeyEvent::press(KeyCode::Right))));
        let ev = parse(r#"{"kind":"key","code":"ArrowLeft"}"#);
        assert_eq!(ev, Some(Event::Key(KeyEvent::press(KeyCode::Left))));
    }

    #[test]
    fn escape_with_modifiers() {
        let ev = parse(r#"{"kind":"key","phase":"down","code":"Escape","mods":3}"#);
        let expected =
            KeyEvent::press(KeyCode::Escape).with_modifiers(Modifiers::SHIFT | Modifiers::CTRL);
        assert_eq!(ev, Some(Event::Key(expected)));
    }

    #[test]
    fn repeat_and_release() {
        let ev = parse(r#"{"kind":"key","phase":"down","code":"ArrowRight","repeat":true}"#);
        assert_eq!(
            ev,
            Some(Event::Key(
                KeyEvent::press(KeyCode::Right).with_kind(KeyEventKind::Repeat)
            ))
        );
        let ev = parse(r#"{"kind":"key","phase":"up","code":"ArrowRight"}"#);
        assert_eq!(
            ev,
            Some(Event::Key(
                KeyEvent::press(KeyCode::Right).with_kind(KeyEventKind::Release)
            ))
        );
    }

    #[test]
    fn resize_and_scroll() {
        assert_eq!(
            parse(r#"{"kind":"resize","width":1024,"height":700}"#),
            Some(Event::Resize(Size::new(1024.0, 700.0)))
        );
        assert_eq!(parse(r#"{"kind":"scroll"}"#), Some(Event::Scroll));
    }

    #[test]
    fn unknown_kind_returns_none() {
        assert_eq!(parse(r#"{"kind":"pointer"}"#), None);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_encoded_input_to_event("not json"),
            Err(InputParseError::Json(_))
        ));
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"key"}"#),
            Err(InputParseError::MissingField("code"))
        );
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"resize","width":1}"#),
            Err(InputParseError::MissingField("height"))
        );
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"key","phase":"hold","code":"a"}"#),
            Err(InputParseError::UnknownPhase("hold".into()))
        );
        assert_eq!(
            InputParseError::MissingField("code").to_string(),
            "missing required field: code"
        );
    }
}
