#![forbid(unsafe_code)]

//! Escape / arrow-key bindings, active only while the tour is open.

use wayfind_core::event::{KeyCode, KeyEvent};
use wayfind_runtime::Subscription;

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Close,
    Next,
    Previous,
}

/// A bound key press and whether the browser default must be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub action: KeyAction,
    pub prevent_default: bool,
}

/// Maps key presses to tour actions while bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardController {
    bound: bool,
}

impl KeyboardController {
    #[must_use]
    pub const fn new() -> Self {
        Self { bound: false }
    }

    /// Bind on open, unbind on close.
    pub fn set_open(&mut self, is_open: bool) {
        self.bound = is_open;
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// The listener this controller needs right now.
    #[must_use]
    pub fn subscription(&self) -> Option<Subscription> {
        self.bound.then_some(Subscription::KeyDown)
    }

    /// Resolve a key event. Unbound controllers ignore everything.
    #[must_use]
    pub fn handle(&self, key: &KeyEvent) -> Option<KeyOutcome> {
        if !self.bound || !key.is_down() {
            return None;
        }
        let (action, prevent_default) = match key.code {
            KeyCode::Escape => (KeyAction::Close, false),
            KeyCode::Right => (KeyAction::Next, true),
            KeyCode::Left => (KeyAction::Previous, true),
            _ => return None,
        };
        Some(KeyOutcome {
            action,
            prevent_default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::event::{KeyEventKind, Modifiers};

    #[test]
    fn closed_controller_ignores_keys() {
        let kb = KeyboardController::new();
        for code in [KeyCode::Escape, KeyCode::Left, KeyCode::Right] {
            assert!(kb.handle(&KeyEvent::press(code)).is_none());
        }
        assert!(kb.subscription().is_none());
    }

    #[test]
    fn open_controller_maps_keys() {
        let mut kb = KeyboardController::new();
        kb.set_open(true);
        assert_eq!(kb.subscription(), Some(Subscription::KeyDown));
        assert_eq!(
            kb.handle(&KeyEvent::press(KeyCode::Escape)),
            Some(KeyOutcome {
                action: KeyAction::Close,
                prevent_default: false
            })
        );
        assert_eq!(
            kb.handle(&KeyEvent::press(KeyCode::Right)).map(|o| o.action),
            Some(KeyAction::Next)
        );
        let prev = kb.handle(&KeyEvent::press(KeyCode::Left)).unwrap();
        assert_eq!(prev.action, KeyAction::Previous);
        assert!(prev.prevent_default);
        assert!(kb.handle(&KeyEvent::press(KeyCode::Enter)).is_none());
    }

    #[test]
    fn modifiers_do_not_block_and_release_is_ignored() {
        let mut kb = KeyboardController::new();
        kb.set_open(true);
        let shifted = KeyEvent::press(KeyCode::Right).with_modifiers(Modifiers::SHIFT);
        assert!(kb.handle(&shifted).is_some());
        let repeat = KeyEvent::press(KeyCode::Right).with_kind(KeyEventKind::Repeat);
        assert!(kb.handle(&repeat).is_some());
        let release = KeyEvent::press(KeyCode::Right).with_kind(KeyEventKind::Release);
        assert!(kb.handle(&release).is_none());
    }

    #[test]
    fn unbinding_stops_handling() {
        let mut kb = KeyboardController::new();
        kb.set_open(true);
        kb.set_open(false);
        assert!(kb.handle(&KeyEvent::press(KeyCode::Escape)).is_none());
    }
}
