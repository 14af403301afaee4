#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the TourRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with a DOM-backed host
//! and a portal that paints each [`OverlayFrame`]. Only compiled on `wasm32`
//! targets.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wayfind_core::geometry::{Rect, Size};
use wayfind_core::host::{
    ElementLocator, ScrollAlign, ScrollBehavior, ScrollIntoViewOptions, TargetElement,
    ViewportSizeSource,
};
use wayfind_runtime::{FrameId, FrameScheduler, ManualFrameScheduler, Subscription};
use wayfind_tour::{ActionLabels, OverlayFrame, TourOutput};
use web_sys::{Document, Element, ScrollLogicalPosition, Window};

use super::runner_core::{RunnerCore, RunnerHost, labels_from_json, output_kind};
use super::style::{DOT_CLASS, HIDDEN, PORTAL_CLASS, PaintPlan};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn logical_position(align: ScrollAlign) -> ScrollLogicalPosition {
    match align {
        ScrollAlign::Start => ScrollLogicalPosition::Start,
        ScrollAlign::Center => ScrollLogicalPosition::Center,
        ScrollAlign::End => ScrollLogicalPosition::End,
        ScrollAlign::Nearest => ScrollLogicalPosition::Nearest,
    }
}

// =============================================================================
// Host
// =============================================================================

/// A live DOM element.
#[derive(Debug, Clone)]
pub struct DomElement(Element);

impl TargetElement for DomElement {
    fn bounding_client_rect(&self) -> Rect {
        let r = self.0.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn scroll_into_view(&self, options: ScrollIntoViewOptions) {
        let opts = web_sys::ScrollIntoViewOptions::new();
        opts.set_behavior(match options.behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        opts.set_block(logical_position(options.block));
        opts.set_inline(logical_position(options.inline));
        self.0.scroll_into_view_with_scroll_into_view_options(&opts);
    }
}

/// The page's window and document.
///
/// Frame requests are queued and run at the start of the next
/// [`TourRunner::step`], which the page calls from `requestAnimationFrame`.
pub struct DomHost {
    window: Window,
    document: Document,
    frames: ManualFrameScheduler,
}

impl DomHost {
    pub fn from_window() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| js_error("window has no document"))?;
        Ok(Self {
            window,
            document,
            frames: ManualFrameScheduler::new(),
        })
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl ViewportSizeSource for DomHost {
    fn viewport_size(&self) -> Size {
        let px = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(px(self.window.inner_width()), px(self.window.inner_height()))
    }
}

impl ElementLocator for DomHost {
    type Element = DomElement;

    fn query_selector(&self, selector: &str) -> Option<DomElement> {
        // Invalid selectors throw; treat them as "not found".
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(DomElement)
    }
}

impl FrameScheduler for DomHost {
    fn request_frame(&mut self) -> FrameId {
        self.frames.request_frame()
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.frames.cancel_frame(id);
    }
}

impl RunnerHost for DomHost {
    fn take_due_frames(&mut self) -> Vec<FrameId> {
        self.frames.take_due()
    }
}

// =============================================================================
// Portal
// =============================================================================

/// Overlay nodes appended to `document.body`.
///
/// Buttons carry `data-tour-action` (`back`, `next`, `close`); the page maps
/// clicks on them to its own step handlers.
pub struct DomPortal {
    root: Element,
    svg: Element,
    path: Element,
    dot: Element,
    tooltip: Element,
    body: Element,
    asset: Element,
    title: Element,
    description: Element,
    counter: Element,
    back: Element,
    next: Element,
    close: Element,
}

fn element(document: &Document, tag: &str, attrs: &[(&str, &str)]) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    for (name, value) in attrs {
        el.set_attribute(name, value)?;
    }
    Ok(el)
}

impl DomPortal {
    pub fn mount(document: &Document) -> Result<Self, JsValue> {
        let root = element(document, "div", &[("class", PORTAL_CLASS), ("style", HIDDEN)])?;

        let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_attribute("aria-hidden", "true")?;
        let path = document.create_element_ns(Some(SVG_NS), "path")?;
        svg.append_child(&path)?;

        let dot = element(document, "div", &[("class", DOT_CLASS), ("aria-hidden", "true")])?;

        let tooltip = element(document, "div", &[])?;
        let body = element(document, "div", &[("class", "wayfind-tour-body")])?;
        let asset = element(document, "img", &[("alt", ""), ("hidden", "")])?;
        let title = element(document, "h2", &[])?;
        let description = element(document, "p", &[])?;
        let counter = element(document, "span", &[("class", "wayfind-tour-counter")])?;
        let back = element(document, "button", &[("type", "button"), ("data-tour-action", "back")])?;
        let next = element(document, "button", &[("type", "button"), ("data-tour-action", "next")])?;
        let close = element(
            document,
            "button",
            &[("type", "button"), ("data-tour-action", "close")],
        )?;

        for child in [&asset, &title, &description, &counter, &back, &next] {
            body.append_child(child)?;
        }
        tooltip.append_child(&close)?;
        tooltip.append_child(&body)?;
        root.append_child(&svg)?;
        root.append_child(&dot)?;
        root.append_child(&tooltip)?;

        document
            .body()
            .ok_or_else(|| js_error("document has no body"))?
            .append_child(&root)?;

        Ok(Self {
            root,
            svg,
            path,
            dot,
            tooltip,
            body,
            asset,
            title,
            description,
            counter,
            back,
            next,
            close,
        })
    }

    /// Write `frame` into the nodes, or hide the portal.
    pub fn paint(&self, frame: Option<&OverlayFrame>) -> Result<(), JsValue> {
        let Some(frame) = frame else {
            return self.root.set_attribute("style", HIDDEN);
        };
        let plan = PaintPlan::for_frame(frame);
        self.root.remove_attribute("style")?;

        self.svg.set_attribute("style", &plan.svg_style)?;
        for (name, value) in &plan.path_attrs {
            self.path.set_attribute(name, value)?;
        }
        self.dot.set_attribute("style", &plan.dot_style)?;

        let layer = &frame.tooltip;
        self.tooltip.set_attribute("class", &plan.tooltip_class)?;
        self.tooltip.set_attribute("style", &plan.tooltip_style)?;
        self.tooltip.set_attribute("role", layer.role)?;
        self.tooltip
            .set_attribute("aria-modal", if layer.aria_modal { "true" } else { "false" })?;
        self.tooltip.set_attribute("aria-labelledby", layer.labelled_by)?;
        self.tooltip.set_attribute("aria-describedby", layer.described_by)?;
        self.tooltip
            .set_attribute("data-step", &frame.step_key.to_string())?;

        let content = &frame.content;
        self.body.set_attribute(
            "style",
            &format!(
                "opacity:{};transition:opacity {}ms ease-out",
                content.phase.opacity(),
                frame.transition.as_millis()
            ),
        )?;
        self.title.set_attribute("id", layer.labelled_by)?;
        self.title.set_text_content(Some(&content.title));
        self.description.set_attribute("id", layer.described_by)?;
        self.description.set_text_content(Some(&content.description));
        self.counter.set_text_content(Some(&content.counter()));

        match &content.asset {
            Some(src) => {
                self.asset.set_attribute("src", src)?;
                self.asset.remove_attribute("hidden")?;
            }
            None => self.asset.set_attribute("hidden", "")?,
        }

        self.back.set_text_content(Some(&content.back_label));
        if content.show_back {
            self.back.remove_attribute("hidden")?;
        } else {
            self.back.set_attribute("hidden", "")?;
        }
        self.next.set_text_content(Some(&content.next_label));
        self.close.set_attribute("aria-label", &content.close_label)?;
        self.close.set_text_content(Some("\u{00d7}"));
        Ok(())
    }

    /// Detach every node from the document.
    pub fn remove(&self) {
        self.root.remove();
    }
}

// =============================================================================
// Runner
// =============================================================================

/// Browser tour runner.
///
/// Host-driven: JavaScript owns the props (`setOpen`, `setCurrentStep`,
/// `setSteps`), forwards window events with `pushEncodedInput`, and calls
/// `step` from `requestAnimationFrame`.
#[wasm_bindgen]
pub struct TourRunner {
    inner: RunnerCore<DomHost>,
    portal: DomPortal,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl TourRunner {
    /// Create a runner and mount its portal. `labels` is optional JSON with
    /// `close`, `next`, `back` and `done` captions.
    #[wasm_bindgen(constructor)]
    pub fn new(labels: Option<String>) -> Result<TourRunner, JsValue> {
        install_panic_hook();
        let labels = match labels {
            Some(json) => labels_from_json(&json).map_err(js_error)?,
            None => ActionLabels::default(),
        };
        let host = DomHost::from_window()?;
        let portal = DomPortal::mount(host.document())?;
        Ok(Self {
            inner: RunnerCore::new(host, labels),
            portal,
        })
    }

    /// Replace the steps from a JSON array. Returns the step count.
    #[wasm_bindgen(js_name = setSteps)]
    pub fn set_steps(&mut self, json: &str) -> Result<u32, JsValue> {
        let count = self.inner.set_steps_json(json).map_err(js_error)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    #[wasm_bindgen(js_name = setOpen)]
    pub fn set_open(&mut self, is_open: bool) {
        self.inner.set_open(is_open);
    }

    #[wasm_bindgen(js_name = setCurrentStep)]
    pub fn set_current_step(&mut self, index: u32) {
        self.inner.set_current_step(index as usize);
    }

    /// Partial config as JSON, e.g. `{"tooltipWidth":360}`.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        self.inner.set_config_json(json).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setClassName)]
    pub fn set_class_name(&mut self, class_name: String) {
        self.inner.set_class_name(class_name);
    }

    /// Advance the clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set the clock to a `performance.now()` timestamp.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    /// Feed one encoded window event. Returns `true` if the page should call
    /// `preventDefault()`. Malformed input is logged and ignored.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        match self.inner.push_encoded_input(json) {
            Ok(prevent_default) => prevent_default,
            Err(err) => {
                console_error(&format!("wayfind: {err}"));
                false
            }
        }
    }

    /// Run queued frames, apply props and timers, and paint.
    /// Returns `{ recomputed, visible, deadline }`; `deadline` is the next
    /// timer in milliseconds, or `null`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        if let Err(err) = self.portal.paint(result.frame.as_ref()) {
            console_error(&format!("wayfind: paint failed: {err:?}"));
        }
        let visible = result.frame.as_ref().is_some_and(|f| f.visible);
        let deadline = self
            .inner
            .next_deadline()
            .map_or(JsValue::NULL, |d| JsValue::from_f64(d.as_secs_f64() * 1000.0));

        let obj = Object::new();
        let _ = Reflect::set(
            &obj,
            &"recomputed".into(),
            &JsValue::from_f64(result.recomputed as f64),
        );
        let _ = Reflect::set(&obj, &"visible".into(), &visible.into());
        let _ = Reflect::set(&obj, &"deadline".into(), &deadline);
        obj.into()
    }

    /// Drain callbacks. Returns `Array<{ kind, index? }>` where `kind` is
    /// `close`, `next`, `previous` or `stepChange`.
    #[wasm_bindgen(js_name = takeOutputs)]
    pub fn take_outputs(&mut self) -> Array {
        let arr = Array::new();
        for output in self.inner.take_outputs() {
            let obj = Object::new();
            let _ = Reflect::set(&obj, &"kind".into(), &output_kind(output).into());
            if let TourOutput::StepChanged(index) = output {
                let _ = Reflect::set(&obj, &"index".into(), &JsValue::from_f64(index as f64));
            }
            arr.push(&obj);
        }
        arr
    }

    /// Listener changes. Returns `{ added, removed }`, each an
    /// `Array<{ type, capture }>` for `addEventListener` on `window`.
    #[wasm_bindgen(js_name = takeSubscriptionDiff)]
    pub fn take_subscription_diff(&mut self) -> JsValue {
        fn listeners(subs: &[Subscription]) -> Array {
            let arr = Array::new();
            for sub in subs {
                let obj = Object::new();
                let _ = Reflect::set(&obj, &"type".into(), &sub.event_type().into());
                let _ = Reflect::set(&obj, &"capture".into(), &sub.capture().into());
                arr.push(&obj);
            }
            arr
        }

        let diff = self.inner.take_subscription_diff();
        let obj = Object::new();
        let _ = Reflect::set(&obj, &"added".into(), &listeners(&diff.added));
        let _ = Reflect::set(&obj, &"removed".into(), &listeners(&diff.removed));
        obj.into()
    }

    /// Cancel pending work and remove the portal. The page should detach
    /// the listeners reported by the following `takeSubscriptionDiff`.
    pub fn destroy(&mut self) {
        self.inner.teardown();
        self.portal.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn dom_element_reads_live_rect() {
        let host = DomHost::from_window().unwrap();
        let el = host.document().create_element("div").unwrap();
        el.set_attribute("id", "wayfind-probe").unwrap();
        el.set_attribute("style", "position:fixed;top:10px;left:20px;width:30px;height:40px")
            .unwrap();
        host.document().body().unwrap().append_child(&el).unwrap();

        let found = host.query_selector("#wayfind-probe").unwrap();
        assert_eq!(found.bounding_client_rect(), Rect::new(20.0, 10.0, 30.0, 40.0));
        assert!(host.query_selector("[[invalid").is_none());
        el.remove();
    }
}
