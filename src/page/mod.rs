//! # Page Abstraction
//!
//! The controller never talks to a concrete document. It talks to the
//! [`Dom`] trait, which exposes exactly the lookups and mutations the
//! portfolio page needs: class tokens, inline styles, attributes, content
//! replacement, ancestry checks and smooth scrolling.
//!
//! ## Implementations
//!
//! - [`HeadlessDocument`] - an in-memory element tree. The TUI host renders
//!   from it and the tests inspect it.
//! - `web::WebDom` - the real browser document (only on `wasm32`).
//!
//! Content is replaced with [`Fragment`]s instead of raw markup so a friend
//! name from the config file can never inject elements into the page.

pub mod document;
pub mod layout;

pub use document::{ElementSpec, HeadlessDocument, NodeId};

use std::fmt;

/// A piece of element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Plain text.
    Text(String),
    /// An inline `<span>` with a single class and text content.
    Span { class: String, text: String },
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text(text.into())
    }

    pub fn span(class: impl Into<String>, text: impl Into<String>) -> Self {
        Fragment::Span {
            class: class.into(),
            text: text.into(),
        }
    }

    /// The text this fragment contributes to its parent's text content.
    pub fn as_text(&self) -> &str {
        match self {
            Fragment::Text(text) => text,
            Fragment::Span { text, .. } => text,
        }
    }
}

/// The document operations the page controller relies on.
///
/// Mutating methods take `&mut self` even though a browser document is
/// internally shared; this keeps the headless implementation a plain value.
pub trait Dom {
    /// Handle to an element. Cheap to clone and comparable by identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// `document.getElementById(id)`
    fn by_id(&self, id: &str) -> Option<Self::Node>;

    /// Every element carrying all of `classes`, in document order.
    fn by_classes(&self, classes: &[&str]) -> Vec<Self::Node>;

    /// First descendant of `root` (excluding `root`) carrying `class`.
    fn descendant_by_class(&self, root: &Self::Node, class: &str) -> Option<Self::Node>;

    /// Every anchor whose `href` starts with `#`, in document order.
    fn hash_links(&self) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Inclusive containment, like `Node.contains`.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if &candidate == ancestor {
                return true;
            }
            current = self.parent(&candidate);
        }
        false
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Toggle `class`; returns whether it is present afterwards.
    fn toggle_class(&mut self, node: &Self::Node, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Inline style property, empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;
    /// Set an inline style property. An empty value clears it.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    fn body_style(&self, property: &str) -> String;
    fn set_body_style(&mut self, property: &str, value: &str);

    /// Replace all children of `node` with `content`.
    fn replace_content(&mut self, node: &Self::Node, content: &[Fragment]);

    fn set_text(&mut self, node: &Self::Node, text: &str) {
        self.replace_content(node, &[Fragment::text(text)]);
    }

    /// Smooth scroll so the top of `node` aligns with the viewport start.
    fn scroll_into_view(&mut self, node: &Self::Node);

    /// Viewport width in CSS pixels (`window.innerWidth`).
    fn viewport_width(&self) -> u32;

    /// Developer console output.
    fn console_log(&mut self, message: &str);
}

/// What a dispatched event did to the host's default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventResponse {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn prevented() -> Self {
        Self {
            default_prevented: true,
            propagation_stopped: false,
        }
    }

    pub(crate) fn merge(&mut self, other: EventResponse) {
        self.default_prevented |= other.default_prevented;
        self.propagation_stopped |= other.propagation_stopped;
    }
}

/// A key press with the modifier state the page cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    /// `KeyboardEvent.key`
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// Events a host feeds into the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<N> {
    /// Bubbles from `target` up to the document.
    Click { target: N },
    /// Delivered at document level.
    KeyDown(KeyChord),
    /// Bubbles. Positive `delta_y` means scrolling down / forward.
    Wheel { target: N, delta_y: f64 },
    /// Does not bubble.
    MouseEnter { target: N },
    /// Does not bubble.
    MouseLeave { target: N },
    /// The viewport was resized; read the width from [`Dom::viewport_width`].
    Resize,
    /// Bubbles.
    TransitionEnd { target: N },
}
