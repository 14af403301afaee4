#![forbid(unsafe_code)]

//! Canonical window events delivered by the host.
//!
//! The host translates its native events (DOM `keydown`, `resize`, `scroll`)
//! into [`Event`] values and pushes them into the engine. Only the fields the
//! engine inspects are modelled.

use bitflags::bitflags;

use crate::geometry::Size;

/// Logical key identity, independent of keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Char(char),
    /// Any key the engine has no name for.
    Unidentified,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "Home" => Self::Home,
            "End" => Self::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Unidentified,
                }
            }
        }
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Press, auto-repeat, or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    #[must_use]
    pub const fn press(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Press or auto-repeat (what `keydown` delivers).
    #[must_use]
    pub fn is_down(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Window-level events the engine listens to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// `keydown` on the window.
    Key(KeyEvent),
    /// The viewport changed size.
    Resize(Size),
    /// Some scroll container (the window or any ancestor of the target) scrolled.
    /// Delivered in the capture phase, so nested scrollers are included.
    Scroll,
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Self::Key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_key_names() {
        assert_eq!(KeyCode::from_dom_key("Escape"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom_key("ArrowLeft"), KeyCode::Left);
        assert_eq!(KeyCode::from_dom_key("ArrowRight"), KeyCode::Right);
        assert_eq!(KeyCode::from_dom_key("a"), KeyCode::Char('a'));
        assert_eq!(KeyCode::from_dom_key("F13"), KeyCode::Unidentified);
        assert_eq!(KeyCode::from_dom_key(""), KeyCode::Unidentified);
    }

    #[test]
    fn legacy_dom_key_names() {
        assert_eq!(KeyCode::from_dom_key("Esc"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom_key("Left"), KeyCode::Left);
    }

    #[test]
    fn press_builder() {
        let ev = KeyEvent::press(KeyCode::Right).with_modifiers(Modifiers::SHIFT);
        assert!(ev.is_down());
        assert!(ev.modifiers.contains(Modifiers::SHIFT));
        assert!(!ev.with_kind(KeyEventKind::Release).is_down());
    }

    #[test]
    fn key_event_into_event() {
        let ev: Event = KeyEvent::press(KeyCode::Escape).into();
        assert!(matches!(ev, Event::Key(k) if k.code == KeyCode::Escape));
    }
}
