//! # Headless Document
//!
//! An in-memory element tree implementing [`Dom`]. It records everything the
//! controller does (class tokens, inline styles, content swaps, scroll
//! requests, console output) so a renderer or a test can read it back.

use super::{Dom, Fragment};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Index of an element inside a [`HeadlessDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Builder describing an element to append.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    content: Vec<Fragment>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add one or more space-separated class tokens.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.content.push(Fragment::text(text));
        self
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    content: Vec<Fragment>,
}

impl Element {
    fn from_spec(spec: ElementSpec, parent: Option<NodeId>) -> Self {
        Self {
            tag: spec.tag,
            id: spec.id,
            classes: spec.classes,
            attributes: spec.attributes,
            styles: BTreeMap::new(),
            parent,
            children: Vec::new(),
            content: spec.content,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessDocument {
    elements: Vec<Element>,
    viewport_width: u32,
    scroll_requests: Vec<NodeId>,
    console: Vec<String>,
}

impl HeadlessDocument {
    /// An empty document containing only `<body>`.
    pub fn new(viewport_width: u32) -> Self {
        Self {
            elements: vec![Element::from_spec(ElementSpec::new("body"), None)],
            viewport_width,
            scroll_requests: Vec::new(),
            console: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let node = NodeId(self.elements.len());
        self.elements.push(Element::from_spec(spec, Some(parent)));
        self.elements[parent.0].children.push(node);
        node
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.elements[node.0].tag
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.elements[node.0].classes
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.elements[node.0].children
    }

    pub fn content(&self, node: NodeId) -> &[Fragment] {
        &self.elements[node.0].content
    }

    /// Own content followed by the text of every descendant.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text: String = self.elements[node.0]
            .content
            .iter()
            .map(Fragment::as_text)
            .collect();
        for child in &self.elements[node.0].children {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    /// Scroll requests issued since the last call, oldest first.
    pub fn take_scroll_requests(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.scroll_requests)
    }

    pub fn scroll_requests(&self) -> &[NodeId] {
        &self.scroll_requests
    }

    pub fn console_messages(&self) -> &[String] {
        &self.console
    }

    /// Every element in document (pre-)order, starting at `<body>`.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack = vec![self.body()];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.elements[node.0].children.iter().rev().copied());
        }
        order
    }

    /// Indented outline of the tree, one element per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in self.walk() {
            let depth = self.depth(node);
            let element = &self.elements[node.0];
            let _ = write!(out, "{}<{}", "  ".repeat(depth), element.tag);
            if let Some(id) = &element.id {
                let _ = write!(out, " id=\"{}\"", id);
            }
            if !element.classes.is_empty() {
                let _ = write!(out, " class=\"{}\"", element.classes.join(" "));
            }
            for (name, value) in &element.attributes {
                let _ = write!(out, " {}=\"{}\"", name, value);
            }
            out.push_str(">\n");
        }
        out
    }

    fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.elements[node.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.elements[parent.0].parent;
        }
        depth
    }
}

impl Dom for HeadlessDocument {
    type Node = NodeId;

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|node| self.elements[node.0].id.as_deref() == Some(id))
    }

    fn by_classes(&self, classes: &[&str]) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|node| classes.iter().all(|class| self.has_class(node, class)))
            .collect()
    }

    fn descendant_by_class(&self, root: &NodeId, class: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|node| node != root && self.has_class(node, class) && self.contains(root, node))
    }

    fn hash_links(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|node| {
                let element = &self.elements[node.0];
                element.tag == "a"
                    && element
                        .attributes
                        .get("href")
                        .is_some_and(|href| href.starts_with('#'))
            })
            .collect()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.elements[node.0].parent
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.elements[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.elements[node.0].classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        self.elements[node.0].classes.retain(|c| c != class);
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.elements[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.elements[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.elements[node.0]
            .styles
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let styles = &mut self.elements[node.0].styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn body_style(&self, property: &str) -> String {
        self.style(&self.body(), property)
    }

    fn set_body_style(&mut self, property: &str, value: &str) {
        let body = self.body();
        self.set_style(&body, property, value);
    }

    fn replace_content(&mut self, node: &NodeId, content: &[Fragment]) {
        self.elements[node.0].content = content.to_vec();
    }

    fn scroll_into_view(&mut self, node: &NodeId) {
        self.scroll_requests.push(*node);
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn console_log(&mut self, message: &str) {
        self.console.push(message.to_string());
    }
}
