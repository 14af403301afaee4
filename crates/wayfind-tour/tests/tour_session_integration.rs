#![forbid(unsafe_code)]

//! A tour session driving the engine end to end, persisting completion to a
//! JSON file.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::Value;
use wayfind_core::event::{Event, KeyCode, KeyEvent};
use wayfind_core::geometry::{Rect, Size};
use wayfind_harness::{DeterminismFixture, FakeDocument, FakeElement, TestJsonlLogger};
use wayfind_tour::{
    BuiltinTour, CompletionStore, JsonFileCompletionStore, NavigationTour, Placement,
    StorageTarget, StoreError, Theme, TourEvent, TourSession, action_labels, english_catalog,
};

fn navigation_document() -> FakeDocument {
    let mut doc = FakeDocument::new(Size::new(1280.0, 800.0));
    for (n, top) in [(1, 20.0), (2, 120.0), (3, 220.0)] {
        doc.insert(
            format!("[data-tour=\"navigation-step-{n}\"]"),
            Rect::from_edges(top, 40.0, 400.0, top + 40.0),
        );
    }
    doc
}

fn pump(tour: &mut NavigationTour<FakeElement>, doc: &mut FakeDocument) {
    for id in doc.take_due_frames() {
        tour.on_frame(id, &*doc);
    }
}

#[test]
fn navigation_tour_runs_to_completion_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tours.json");
    let store = JsonFileCompletionStore::open(&path).unwrap();
    let mut session = TourSession::new(
        BuiltinTour::Navigation.steps(),
        BuiltinTour::Navigation.storage_target("acme"),
        store,
    );
    assert!(session.is_open());

    let catalog = english_catalog().unwrap();
    let steps = session.translated_steps(&catalog, "en", Theme::Dark);
    let mut doc = navigation_document();
    let mut tour = NavigationTour::new().labels(action_labels(&catalog, "en"));
    let fixture = DeterminismFixture::new_with("navigation_tour", 0, true, 50);
    let logger = TestJsonlLogger::new(DeterminismFixture::new_with("navigation_tour", 0, true, 50));
    let right = Event::Key(KeyEvent::press(KeyCode::Right));

    let mut titles = Vec::new();
    let mut now = Duration::ZERO;
    while session.is_open() {
        tour.sync(&session.props(&steps), &mut doc, now);
        // Let the step transition settle before reading the frame.
        for _ in 0..6 {
            now = fixture.step();
            tour.tick(&mut doc, now);
            pump(&mut tour, &mut doc);
        }
        let frame = tour.render().unwrap();
        assert_eq!(frame.tooltip.arrow_placement.as_str(), "top");
        logger.log(
            "frame",
            &[
                ("step", frame.step_key.into()),
                ("top", frame.tooltip.top.into()),
                ("left", frame.tooltip.left.into()),
            ],
        );
        titles.push(frame.content.title.clone());

        assert!(tour.handle_event(&right, &mut doc));
        for output in tour.take_outputs() {
            session.apply(output);
        }
    }
    tour.sync(&session.props(&steps), &mut doc, now);

    assert_eq!(
        titles,
        vec![
            "Find anything instantly",
            "Stay in control of updates",
            "Personalize Your Navigation",
        ]
    );
    assert_eq!(
        session.take_events(),
        vec![TourEvent::Completed, TourEvent::Closed]
    );
    assert!(tour.subscriptions().is_empty());

    let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk["user_profile"]["is_navigation_tour_completed"], true);

    let reopened = TourSession::new(
        BuiltinTour::Navigation.steps(),
        StorageTarget::UserProfile,
        JsonFileCompletionStore::open(&path).unwrap(),
    );
    assert!(!reopened.is_open());
}

#[test]
fn first_frame_uses_bottom_right_placement() {
    let session = TourSession::new(
        BuiltinTour::Navigation.steps(),
        StorageTarget::UserProfile,
        wayfind_tour::MemoryCompletionStore::new(),
    );
    let steps = session.steps().to_vec();
    let mut doc = navigation_document();
    let mut tour = NavigationTour::new();
    tour.sync(&session.props(&steps), &mut doc, Duration::ZERO);
    pump(&mut tour, &mut doc);

    let position = tour.position().unwrap();
    assert_eq!(position.tooltip.placement, Placement::BottomRight);
    assert_eq!((position.tooltip.top, position.tooltip.left), (100.0, 80.0));
    let frame = tour.render().unwrap();
    assert!(!frame.content.show_back);
    assert_eq!(frame.content.counter(), "1 of 3");
}

#[test]
fn escape_closes_and_records_completion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tours.json");
    let mut session = TourSession::new(
        BuiltinTour::Navigation.steps(),
        StorageTarget::UserProfile,
        JsonFileCompletionStore::open(&path).unwrap(),
    );
    let steps = session.steps().to_vec();
    let mut doc = navigation_document();
    let mut tour = NavigationTour::new();
    tour.sync(&session.props(&steps), &mut doc, Duration::ZERO);

    let esc = Event::Key(KeyEvent::press(KeyCode::Escape));
    assert!(!tour.handle_event(&esc, &mut doc));
    for output in tour.take_outputs() {
        session.apply(output);
    }
    assert!(!session.is_open());
    assert!(session.store().is_completed(&StorageTarget::UserProfile));
}

#[test]
fn workspace_flags_merge_in_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tours.json");

    for tour in [BuiltinTour::Cycle, BuiltinTour::Module] {
        let mut session = TourSession::new(
            tour.steps(),
            tour.storage_target("acme"),
            JsonFileCompletionStore::open(&path).unwrap(),
        );
        session.skip();
        assert_eq!(
            session.take_events(),
            vec![TourEvent::Skipped, TourEvent::Closed]
        );
    }

    let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk["workspaces"]["acme"]["product_tour"]["cycle"], true);
    assert_eq!(on_disk["workspaces"]["acme"]["product_tour"]["module"], true);
    assert_eq!(on_disk["user_profile"]["is_navigation_tour_completed"], false);
    assert!(!dir.path().join("tours.json.tmp").exists());

    let store = JsonFileCompletionStore::open(&path).unwrap();
    assert!(!store.is_completed(&BuiltinTour::Page.storage_target("acme")));
    assert!(!store.is_completed(&BuiltinTour::Cycle.storage_target("other")));
}

#[test]
fn completion_elsewhere_closes_open_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tours.json");
    let target = BuiltinTour::Intake.storage_target("acme");

    let mut session = TourSession::new(
        BuiltinTour::Intake.steps(),
        target.clone(),
        JsonFileCompletionStore::open(&path).unwrap(),
    );
    let mut other = JsonFileCompletionStore::open(&path).unwrap();
    other.mark_completed(&target).unwrap();

    session.sync_completion();
    assert!(session.is_open(), "stale view until reloaded");
    session.store_mut().reload().unwrap();
    session.sync_completion();
    assert!(!session.is_open());
    assert!(session.take_events().is_empty());
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tours.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let err = JsonFileCompletionStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Json(_)), "{err}");
}
