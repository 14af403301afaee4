#![forbid(unsafe_code)]

//! Declarative window-listener subscriptions.
//!
//! The engine states which listeners it needs right now; the host attaches
//! and detaches real listeners from the [`SubscriptionDiff`] it gets back.
//! Recomputing the desired set on every state change means a teardown can
//! never leave a listener behind.
//!
//! # Invariants
//!
//! 1. After `reconcile(desired)`, the active set equals `desired`.
//! 2. A diff never lists the same subscription as both added and removed.
//! 3. `clear()` reports every active subscription as removed.

use std::collections::BTreeSet;

/// A window listener the engine depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subscription {
    /// `keydown` on the window.
    KeyDown,
    /// `resize` on the window.
    Resize,
    /// `scroll` on the window, in the capture phase so scrolls of any
    /// ancestor container are observed too.
    ScrollCapture,
}

impl Subscription {
    /// DOM event type name.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::Resize => "resize",
            Self::ScrollCapture => "scroll",
        }
    }

    /// Whether the listener registers for the capture phase.
    #[must_use]
    pub const fn capture(self) -> bool {
        matches!(self, Self::ScrollCapture)
    }
}

/// Listeners to attach and detach after a reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionDiff {
    pub added: Vec<Subscription>,
    pub removed: Vec<Subscription>,
}

impl SubscriptionDiff {
    /// True if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Fold a later diff into this one, cancelling add/remove pairs.
    pub fn merge(&mut self, later: SubscriptionDiff) {
        for sub in later.removed {
            if let Some(pos) = self.added.iter().position(|s| *s == sub) {
                self.added.remove(pos);
            } else if !self.removed.contains(&sub) {
                self.removed.push(sub);
            }
        }
        for sub in later.added {
            if let Some(pos) = self.removed.iter().position(|s| *s == sub) {
                self.removed.remove(pos);
            } else if !self.added.contains(&sub) {
                self.added.push(sub);
            }
        }
    }
}

/// The currently active subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionSet {
    active: BTreeSet<Subscription>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set with `desired`, returning what changed.
    pub fn reconcile(
        &mut self,
        desired: impl IntoIterator<Item = Subscription>,
    ) -> SubscriptionDiff {
        let desired: BTreeSet<Subscription> = desired.into_iter().collect();
        let added = desired.difference(&self.active).copied().collect();
        let removed = self.active.difference(&desired).copied().collect();
        self.active = desired;
        SubscriptionDiff { added, removed }
    }

    /// Drop every subscription.
    pub fn clear(&mut self) -> SubscriptionDiff {
        self.reconcile(std::iter::empty())
    }

    /// Whether `sub` is active.
    #[must_use]
    pub fn contains(&self, sub: Subscription) -> bool {
        self.active.contains(&sub)
    }

    /// Whether nothing is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active subscriptions in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Subscription> + '_ {
        self.active.iter().copied()
    }
}
