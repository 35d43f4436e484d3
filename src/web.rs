//! # Browser Host
//!
//! Binds the page controller to the live document when the crate is built
//! for `wasm32`. [`WebDom`] implements [`Dom`] over `web_sys`, and
//! [`start`] registers the listeners and keeps a single `setTimeout` armed
//! for the controller's next deferred task.
//!
//! Page time is wall-clock time: before every dispatch the controller is
//! advanced by the milliseconds elapsed since the previous one.
//!
//! No tracing subscriber is installed here, so the controller's `tracing`
//! events are dropped. DOM call failures in this host go to `console.warn`.

use crate::controller::{selectors, ControllerSettings, PageInteractionController};
use crate::page::{Dom, EventResponse, Fragment, KeyChord, PageEvent};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, WheelEvent, Window,
};

/// The browser document seen through [`Dom`].
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn by_classes(&self, classes: &[&str]) -> Vec<Element> {
        let selector: String = classes.iter().map(|class| format!(".{}", class)).collect();
        self.query_all(&selector)
    }

    fn descendant_by_class(&self, root: &Element, class: &str) -> Option<Element> {
        root.query_selector(&format!(".{}", class)).ok().flatten()
    }

    fn hash_links(&self) -> Vec<Element> {
        self.query_all(r##"a[href^="#"]"##)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            report("classList.add failed", &err);
        }
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            report("classList.remove failed", &err);
        }
    }

    fn toggle_class(&mut self, node: &Element, class: &str) -> bool {
        node.class_list()
            .toggle(class)
            .unwrap_or_else(|_| node.class_list().contains(class))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            report("setAttribute failed", &err);
        }
    }

    fn style(&self, node: &Element, property: &str) -> String {
        node.dyn_ref::<HtmlElement>()
            .and_then(|element| element.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        set_property(element, property, value);
    }

    fn body_style(&self, property: &str) -> String {
        self.document
            .body()
            .and_then(|body| body.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_body_style(&mut self, property: &str, value: &str) {
        if let Some(body) = self.document.body() {
            set_property(&body, property, value);
        }
    }

    fn replace_content(&mut self, node: &Element, content: &[Fragment]) {
        node.set_text_content(None);
        for fragment in content {
            let appended = match fragment {
                Fragment::Text(text) => node.append_with_str_1(text),
                Fragment::Span { class, text } => {
                    self.document.create_element("span").and_then(|span| {
                        span.set_class_name(class);
                        span.set_text_content(Some(text));
                        node.append_with_node_1(&span)
                    })
                }
            };
            if let Err(err) = appended {
                report("failed to append content", &err);
            }
        }
    }

    fn scroll_into_view(&mut self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn viewport_width(&self) -> u32 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .map_or(0, |width| width.max(0.0) as u32)
    }

    fn console_log(&mut self, message: &str) {
        web_sys::console::log_1(&JsValue::from_str(message));
    }
}

fn report(context: &str, err: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(context), err);
}

fn set_property(element: &HtmlElement, property: &str, value: &str) {
    let style = element.style();
    let result = if value.is_empty() {
        style.remove_property(property).map(|_| ())
    } else {
        style.set_property(property, value)
    };
    if let Err(err) = result {
        report("style update failed", &err);
    }
}

struct WebHost {
    controller: PageInteractionController<WebDom>,
    /// `Date.now()` at the last clock sync.
    synced_at: f64,
    timeout: Option<i32>,
}

type Shared = Rc<RefCell<WebHost>>;

impl WebHost {
    fn sync_clock(&mut self) {
        let now = js_sys::Date::now();
        let elapsed = (now - self.synced_at).max(0.0);
        self.synced_at = now;
        self.controller.advance(Duration::from_secs_f64(elapsed / 1000.0));
    }

    fn dispatch(host: &Shared, event: PageEvent<Element>) -> EventResponse {
        let response = {
            let mut state = host.borrow_mut();
            state.sync_clock();
            state.controller.dispatch(event)
        };
        Self::arm_timer(host);
        response
    }

    /// Replace the pending `setTimeout` with one for the next due task.
    fn arm_timer(host: &Shared) {
        let mut state = host.borrow_mut();
        let window = state.controller.dom().window.clone();
        if let Some(id) = state.timeout.take() {
            window.clear_timeout_with_handle(id);
        }
        let Some(due) = state.controller.next_due() else {
            return;
        };

        let host_ref = Rc::clone(host);
        let callback = Closure::once_into_js(move || {
            {
                let mut state = host_ref.borrow_mut();
                state.timeout = None;
                state.sync_clock();
            }
            WebHost::arm_timer(&host_ref);
        });
        let delay = i32::try_from(due.as_millis()).unwrap_or(i32::MAX);
        match window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(id) => state.timeout = Some(id),
            Err(err) => report("setTimeout failed", &err),
        }
    }
}

/// Register `translate` as a listener on `target`; the page event it yields
/// is dispatched and the response applied to the DOM event.
fn listen(
    target: &EventTarget,
    kind: &str,
    host: &Shared,
    passive: Option<bool>,
    translate: impl Fn(&Event) -> Option<PageEvent<Element>> + 'static,
) -> Result<(), JsValue> {
    let host_ref = Rc::clone(host);
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(page_event) = translate(&event) else {
            return;
        };
        let response = WebHost::dispatch(&host_ref, page_event);
        if response.default_prevented {
            event.prevent_default();
        }
        if response.propagation_stopped {
            event.stop_propagation();
        }
    });

    match passive {
        Some(passive) => {
            let options = AddEventListenerOptions::new();
            options.set_passive(passive);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
        }
        None => {
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        }
    }
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn event_target(event: &Event) -> Option<Element> {
    event.target().and_then(|target| target.dyn_into::<Element>().ok())
}

fn bind(window: Window, document: Document) -> Result<(), JsValue> {
    let dom = WebDom::new(window.clone(), document.clone());
    let container = dom.by_id(selectors::FRIEND_CONTAINER_ID);
    let fold = dom.by_id(selectors::CORNER_FOLD_ID);
    let sidebar = dom.by_id(selectors::SIDEBAR_ID);
    let lines = dom.by_classes(&[selectors::TERMINAL_LINE_CLASS]);

    let controller = PageInteractionController::initialize(dom, ControllerSettings::default())
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let host: Shared = Rc::new(RefCell::new(WebHost {
        controller,
        synced_at: js_sys::Date::now(),
        timeout: None,
    }));

    listen(&document, "click", &host, None, |event| {
        event_target(event).map(|target| PageEvent::Click { target })
    })?;
    listen(&document, "keydown", &host, None, |event| {
        let key = event.dyn_ref::<KeyboardEvent>()?;
        Some(PageEvent::KeyDown(KeyChord {
            key: key.key(),
            ctrl: key.ctrl_key(),
            meta: key.meta_key(),
        }))
    })?;
    listen(&window, "resize", &host, None, |_| Some(PageEvent::Resize))?;

    if let Some(sidebar) = sidebar {
        listen(&sidebar, "transitionend", &host, None, |event| {
            event_target(event).map(|target| PageEvent::TransitionEnd { target })
        })?;
    }
    if let Some(fold) = fold {
        // Not passive: rotating the friend list cancels the page scroll.
        listen(&fold, "wheel", &host, Some(false), |event| {
            let delta_y = event.dyn_ref::<WheelEvent>()?.delta_y();
            event_target(event).map(|target| PageEvent::Wheel { target, delta_y })
        })?;
    }

    let hover_targets = container.into_iter().chain(lines);
    for element in hover_targets {
        let entered = element.clone();
        listen(&element, "mouseenter", &host, None, move |_| {
            Some(PageEvent::MouseEnter {
                target: entered.clone(),
            })
        })?;
        let left = element.clone();
        listen(&element, "mouseleave", &host, None, move |_| {
            Some(PageEvent::MouseLeave {
                target: left.clone(),
            })
        })?;
    }

    WebHost::arm_timer(&host);
    Ok(())
}

/// Entry point run when the module is instantiated. Binding waits for
/// `DOMContentLoaded` if the document is still loading.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        return bind(window, document);
    }

    let target = document.clone();
    let on_ready = Closure::once_into_js(move || {
        if let Err(err) = bind(window, document) {
            web_sys::console::error_1(&err);
        }
    });
    target.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    Ok(())
}
