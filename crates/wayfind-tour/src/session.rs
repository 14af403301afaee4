#![forbid(unsafe_code)]

//! Tour session: the host-side state a [`NavigationTour`] is driven by.
//!
//! A session owns `is_open` and the current step, moves between steps, and
//! records completion through a [`CompletionStore`]. It starts open only if
//! the store has no completion recorded for its target.
//!
//! [`NavigationTour`]: crate::navigation_tour::NavigationTour

use std::collections::VecDeque;

use tracing::{debug, error};
use wayfind_i18n::StringCatalog;

use crate::catalog::Theme;
use crate::completion::{CompletionStore, StorageTarget};
use crate::navigation_tour::{TourOutput, TourProps};
use crate::step::TourStep;

/// Lifecycle notifications for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    /// Finished by reaching the end or closing.
    Completed,
    /// Dismissed with skip.
    Skipped,
    /// The tour closed after a successful completion or skip.
    Closed,
}

/// Step navigation plus completion persistence for one tour.
#[derive(Debug)]
pub struct TourSession<S> {
    store: S,
    target: StorageTarget,
    steps: Vec<TourStep>,
    is_open: bool,
    current_step: usize,
    events: VecDeque<TourEvent>,
}

impl<S: CompletionStore> TourSession<S> {
    pub fn new(steps: Vec<TourStep>, target: StorageTarget, store: S) -> Self {
        let is_open = !store.is_completed(&target);
        debug!(storage = ?target, is_open, steps = steps.len(), "tour session created");
        Self {
            store,
            target,
            steps,
            is_open,
            current_step: 0,
            events: VecDeque::new(),
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Advance, or complete the tour on the last step.
    pub fn next(&mut self) {
        if self.current_step + 1 < self.steps.len() {
            self.current_step += 1;
        } else {
            self.close();
        }
    }

    pub fn previous(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
    }

    /// Jump to `index`; out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.steps.len() {
            self.current_step = index;
        }
    }

    /// Close and record completion.
    pub fn close(&mut self) {
        self.finish(TourEvent::Completed);
    }

    /// Dismiss; also recorded as completed.
    pub fn skip(&mut self) {
        self.finish(TourEvent::Skipped);
    }

    /// Apply a callback emitted by the engine.
    pub fn apply(&mut self, output: TourOutput) {
        match output {
            TourOutput::Close => self.close(),
            TourOutput::Next => self.next(),
            TourOutput::Previous => self.previous(),
            TourOutput::StepChanged(_) => {}
        }
    }

    /// Close an open tour once the store reports it completed elsewhere.
    pub fn sync_completion(&mut self) {
        if self.is_open && self.is_completed() {
            debug!(storage = ?self.target, "tour completed elsewhere, closing");
            self.is_open = false;
        }
    }

    fn finish(&mut self, event: TourEvent) {
        self.is_open = false;
        match self.store.mark_completed(&self.target) {
            Ok(()) => {
                self.events.push_back(event);
                self.events.push_back(TourEvent::Closed);
            }
            Err(err) => {
                error!(storage = ?self.target, error = %err, "failed to record tour completion");
            }
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.store.is_completed(&self.target)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.steps.len()
    }

    #[must_use]
    pub fn current_step_data(&self) -> Option<&TourStep> {
        self.steps.get(self.current_step)
    }

    #[must_use]
    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    #[must_use]
    pub fn storage_target(&self) -> &StorageTarget {
        &self.target
    }

    /// Steps with titles and descriptions translated and assets expanded
    /// for `theme`. Keys missing from the catalog are shown as-is.
    #[must_use]
    pub fn translated_steps(
        &self,
        catalog: &StringCatalog,
        locale: &str,
        theme: Theme,
    ) -> Vec<TourStep> {
        self.steps
            .iter()
            .map(|step| TourStep {
                title: catalog.translate(locale, &step.title).into_owned(),
                description: catalog.translate(locale, &step.description).into_owned(),
                asset: step.asset.as_deref().map(|base| theme.asset_url(base)),
                ..step.clone()
            })
            .collect()
    }

    /// Illustrations to preload; empty while closed.
    #[must_use]
    pub fn asset_urls(&self, theme: Theme) -> Vec<String> {
        if !self.is_open {
            return Vec::new();
        }
        self.steps
            .iter()
            .filter_map(|s| s.asset.as_deref())
            .map(|base| theme.asset_url(base))
            .collect()
    }

    /// Engine props for this session over `steps` (usually the translated ones).
    #[must_use]
    pub fn props<'a>(&self, steps: &'a [TourStep]) -> TourProps<'a> {
        TourProps::new(steps)
            .open(self.is_open)
            .step(self.current_step)
    }

    /// Drain lifecycle events in order.
    pub fn take_events(&mut self) -> Vec<TourEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BuiltinTour, english_catalog};
    use crate::completion::MemoryCompletionStore;

    fn session() -> TourSession<MemoryCompletionStore> {
        TourSession::new(
            BuiltinTour::Cycle.steps(),
            BuiltinTour::Cycle.storage_target("acme"),
            MemoryCompletionStore::new(),
        )
    }

    #[test]
    fn starts_open_when_not_completed() {
        let s = session();
        assert!(s.is_open());
        assert!(s.is_first_step());
        assert_eq!(s.total_steps(), 5);

        let done = MemoryCompletionStore::new().with_completed(StorageTarget::UserProfile);
        let s = TourSession::new(BuiltinTour::Navigation.steps(), StorageTarget::UserProfile, done);
        assert!(!s.is_open());
    }

    #[test]
    fn navigation_bounds() {
        let mut s = session();
        s.previous();
        assert_eq!(s.current_step(), 0);
        s.go_to(4);
        assert!(s.is_last_step());
        s.go_to(9);
        assert_eq!(s.current_step(), 4);
        s.previous();
        assert_eq!(s.current_step(), 3);
    }

    #[test]
    fn next_on_last_step_completes() {
        let mut s = session();
        s.go_to(4);
        s.next();
        assert!(!s.is_open());
        assert!(s.is_completed());
        assert_eq!(s.take_events(), vec![TourEvent::Completed, TourEvent::Closed]);
    }

    #[test]
    fn skip_marks_completed() {
        let mut s = session();
        s.skip();
        assert!(s.is_completed());
        assert_eq!(s.take_events(), vec![TourEvent::Skipped, TourEvent::Closed]);
    }

    #[test]
    fn persistence_failure_still_closes_silently() {
        let mut s = session();
        s.store_mut().reject_writes("offline");
        s.close();
        assert!(!s.is_open());
        assert!(!s.is_completed());
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn sync_completion_closes_open_tour() {
        let mut s = session();
        s.store_mut().complete_externally(StorageTarget::workspace("acme", "cycle"));
        s.sync_completion();
        assert!(!s.is_open());
        s.open();
        assert!(s.is_open());
    }

    #[test]
    fn translation_and_assets() {
        let s = session();
        let catalog = english_catalog().unwrap();
        let steps = s.translated_steps(&catalog, "en", Theme::Dark);
        assert_eq!(steps[0].title, "Make progress with Cycles");
        assert_eq!(steps[2].asset.as_deref(), Some("/tour/cycle/step-2-dark.webp"));
        assert_eq!(steps[0].id, "step-0");

        let urls = s.asset_urls(Theme::Light);
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[0], "/tour/cycle/step-0-light.webp");
    }

    #[test]
    fn engine_outputs_drive_session() {
        let mut s = session();
        s.apply(TourOutput::Next);
        s.apply(TourOutput::StepChanged(1));
        assert_eq!(s.current_step(), 1);
        let steps = s.steps().to_vec();
        let props = s.props(&steps);
        assert!(props.is_open);
        assert_eq!(props.current_step, 1);
        s.apply(TourOutput::Close);
        assert!(!s.is_open());
    }
}
