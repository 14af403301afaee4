#![forbid(unsafe_code)]

//! In-memory stand-in for `window` + `document`.
//!
//! Elements share their state with the document through `Rc<RefCell<_>>`,
//! so scrolling the document moves every element the engine already holds,
//! the same way a real `getBoundingClientRect()` reflects scrolling.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use wayfind_core::geometry::{Rect, Size};
use wayfind_core::host::{ElementLocator, ScrollIntoViewOptions, TargetElement, ViewportSizeSource};
use wayfind_runtime::{FrameId, FrameScheduler, ManualFrameScheduler};

#[derive(Debug, Default)]
struct ElementState {
    rect: Rect,
    rect_reads: u64,
    scrolls: Vec<ScrollIntoViewOptions>,
    attached: bool,
}

/// A live element handle.
#[derive(Debug, Clone)]
pub struct FakeElement {
    state: Rc<RefCell<ElementState>>,
}

impl FakeElement {
    fn new(rect: Rect) -> Self {
        Self {
            state: Rc::new(RefCell::new(ElementState {
                rect,
                attached: true,
                ..ElementState::default()
            })),
        }
    }

    /// Move or resize the element.
    pub fn set_rect(&self, rect: Rect) {
        self.state.borrow_mut().rect = rect;
    }

    /// Current rectangle without counting as a read.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.state.borrow().rect
    }

    /// How many times the engine measured this element.
    #[must_use]
    pub fn rect_reads(&self) -> u64 {
        self.state.borrow().rect_reads
    }

    /// Every `scrollIntoView` call, in order.
    #[must_use]
    pub fn scroll_calls(&self) -> Vec<ScrollIntoViewOptions> {
        self.state.borrow().scrolls.clone()
    }

    /// False once removed from the document.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }
}

impl TargetElement for FakeElement {
    fn bounding_client_rect(&self) -> Rect {
        let mut state = self.state.borrow_mut();
        state.rect_reads += 1;
        state.rect
    }

    fn scroll_into_view(&self, options: ScrollIntoViewOptions) {
        self.state.borrow_mut().scrolls.push(options);
    }
}

/// Document with selector-addressed elements and a manual frame queue.
#[derive(Debug)]
pub struct FakeDocument {
    viewport: Size,
    elements: BTreeMap<String, FakeElement>,
    frames: ManualFrameScheduler,
    queries: RefCell<Vec<String>>,
}

impl FakeDocument {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            elements: BTreeMap::new(),
            frames: ManualFrameScheduler::new(),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Add (or replace) the element matched by `selector`.
    pub fn insert(&mut self, selector: impl Into<String>, rect: Rect) -> FakeElement {
        let element = FakeElement::new(rect);
        if let Some(old) = self.elements.insert(selector.into(), element.clone()) {
            old.state.borrow_mut().attached = false;
        }
        element
    }

    /// Remove the element matched by `selector`.
    pub fn remove(&mut self, selector: &str) -> Option<FakeElement> {
        let removed = self.elements.remove(selector)?;
        removed.state.borrow_mut().attached = false;
        Some(removed)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Scroll the page content by `(dy, dx)`; elements move the opposite way.
    pub fn scroll_by(&mut self, dy: f64, dx: f64) {
        for element in self.elements.values() {
            let mut state = element.state.borrow_mut();
            state.rect = state.rect.translate(-dy, -dx);
        }
    }

    /// Frames to run, as if the browser painted now.
    pub fn take_due_frames(&mut self) -> Vec<FrameId> {
        self.frames.take_due()
    }

    #[must_use]
    pub fn frames(&self) -> &ManualFrameScheduler {
        &self.frames
    }

    /// Selectors queried so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl ViewportSizeSource for FakeDocument {
    fn viewport_size(&self) -> Size {
        self.viewport
    }
}

impl ElementLocator for FakeDocument {
    type Element = FakeElement;

    fn query_selector(&self, selector: &str) -> Option<FakeElement> {
        self.queries.borrow_mut().push(selector.to_string());
        self.elements.get(selector).cloned()
    }
}

impl FrameScheduler for FakeDocument {
    fn request_frame(&mut self) -> FrameId {
        self.frames.request_frame()
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.frames.cancel_frame(id);
    }
}
