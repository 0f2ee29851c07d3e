//! In-memory fixture page
//!
//! [`FixtureDom`] is a small arena document that implements [`Driver`], so
//! page objects can be exercised without a browser. Nodes carry a tag,
//! attributes, text and a visibility flag; click handlers may rewrite the
//! document to model dropdowns opening or rows being appended.
//!
//! # Example
//!
//! ```ignore
//! let mut dom = FixtureDom::new();
//! let body = dom.root();
//! let menu = dom.element(body, "div", &[("data-qa-selector", "menu")], "");
//! dom.set_visible(menu, false);
//! let toggle = dom.element(body, "button", &[], "Open");
//! dom.on_click(toggle, move |dom, _| dom.set_visible(menu, true));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::driver::{Driver, ElementHandle};
use crate::result::{PageError, PageResult};
use crate::selector::Selector;

/// Index of a node in a [`FixtureDom`]
pub type NodeId = usize;

/// Handler run after a node is clicked
pub type ClickHandler = Box<dyn FnMut(&mut FixtureDom, NodeId)>;

const HANDLE_PREFIX: &str = "node-";

/// Tags that a visible-text selector can target
const INTERACTIVE_TAGS: &[&str] = &["a", "button"];

/// Roles that make any tag targetable by a visible-text selector
const INTERACTIVE_ROLES: &[&str] = &["button", "link", "option", "menuitem"];

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    visible: bool,
    attached: bool,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            parent,
            visible: true,
            attached: true,
        }
    }
}

/// Arena-backed document used as a test driver
pub struct FixtureDom {
    nodes: Vec<Node>,
    handlers: HashMap<NodeId, ClickHandler>,
    clicks: Vec<NodeId>,
}

impl fmt::Debug for FixtureDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureDom")
            .field("node_count", &self.nodes.len())
            .field("handler_count", &self.handlers.len())
            .field("clicks", &self.clicks)
            .finish()
    }
}

impl Default for FixtureDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureDom {
    /// Create a document holding an empty `body`
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body", None)],
            handlers: HashMap::new(),
            clicks: Vec::new(),
        }
    }

    /// The document root
    #[must_use]
    pub const fn root(&self) -> NodeId {
        0
    }

    /// Append an empty child node
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(tag, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Append a child with attributes and text in one call
    pub fn element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> NodeId {
        let id = self.append(parent, tag);
        for (name, value) in attributes {
            self.set_attribute(id, name, value);
        }
        self.set_text(id, text);
        id
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let _ = self.nodes[id]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Add a class to the `class` attribute
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let classes = self.nodes[id]
            .attributes
            .entry("class".to_string())
            .or_default();
        if !classes.split_whitespace().any(|c| c == class) {
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(class);
        }
    }

    /// Attribute value
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id].attributes.get(name).map(String::as_str)
    }

    /// Replace the node's own text
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        text.clone_into(&mut self.nodes[id].text);
    }

    /// Show or hide a node and its subtree
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id].visible = visible;
    }

    /// Check the node and all its ancestors are visible
    #[must_use]
    pub fn is_displayed(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if !self.nodes[node].visible {
                return false;
            }
            current = self.nodes[node].parent;
        }
        true
    }

    /// Direct children in document order
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Detach every child of a node; handles to them become stale
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        let mut stack = children;
        while let Some(child) = stack.pop() {
            self.nodes[child].attached = false;
            let _ = self.handlers.remove(&child);
            stack.extend(self.nodes[child].children.iter().copied());
        }
    }

    /// Concatenated text of the node and its descendants
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        out.push_str(&self.nodes[id].text);
        for &child in &self.nodes[id].children {
            self.collect_text(child, out);
        }
    }

    /// Register a handler run after the node is clicked
    pub fn on_click(&mut self, id: NodeId, handler: impl FnMut(&mut Self, NodeId) + 'static) {
        let _ = self.handlers.insert(id, Box::new(handler));
    }

    /// Nodes clicked so far, oldest first
    #[must_use]
    pub fn clicks(&self) -> &[NodeId] {
        &self.clicks
    }

    /// Check if a node was clicked
    #[must_use]
    pub fn was_clicked(&self, id: NodeId) -> bool {
        self.clicks.contains(&id)
    }

    /// Snapshot of a node as an element handle
    #[must_use]
    pub fn handle(&self, id: NodeId) -> ElementHandle {
        let node = &self.nodes[id];
        ElementHandle {
            id: format!("{HANDLE_PREFIX}{id}"),
            tag_name: node.tag.clone(),
            text_content: Some(self.text_content(id)),
            attributes: node.attributes.clone(),
        }
    }

    /// Map a handle back to a live node
    pub fn node_id(&self, handle: &ElementHandle) -> PageResult<NodeId> {
        handle
            .id
            .strip_prefix(HANDLE_PREFIX)
            .and_then(|n| n.parse::<NodeId>().ok())
            .filter(|&id| id < self.nodes.len() && self.nodes[id].attached)
            .ok_or_else(|| PageError::StaleElement {
                id: handle.id.clone(),
            })
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        let node = &self.nodes[id];
        match selector {
            Selector::Attribute { name, value } => {
                node.attributes.get(name).is_some_and(|v| v == value)
            }
            Selector::Class(class) => node
                .attributes
                .get("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
            Selector::Text(text) => {
                let interactive = INTERACTIVE_TAGS.contains(&node.tag.as_str())
                    || node
                        .attributes
                        .get("role")
                        .is_some_and(|role| INTERACTIVE_ROLES.contains(&role.as_str()));
                interactive && self.text_content(id).trim() == text.trim()
            }
        }
    }

    fn collect_matches(&self, id: NodeId, selector: &Selector, out: &mut Vec<ElementHandle>) {
        for &child in &self.nodes[id].children {
            if !self.nodes[child].visible {
                continue;
            }
            if self.matches(child, selector) {
                out.push(self.handle(child));
            }
            self.collect_matches(child, selector, out);
        }
    }
}

impl Driver for FixtureDom {
    fn query_all(
        &self,
        root: Option<&ElementHandle>,
        selector: &Selector,
    ) -> PageResult<Vec<ElementHandle>> {
        let start = match root {
            Some(handle) => {
                let id = self.node_id(handle)?;
                if !self.is_displayed(id) {
                    return Ok(Vec::new());
                }
                id
            }
            None => self.root(),
        };

        let mut out = Vec::new();
        self.collect_matches(start, selector, &mut out);
        Ok(out)
    }

    fn click(&mut self, element: &ElementHandle) -> PageResult<()> {
        let id = self.node_id(element)?;
        if !self.is_displayed(id) {
            return Err(PageError::not_found(
                format!("#{}", element.id),
                "element is hidden",
            ));
        }

        self.clicks.push(id);
        if let Some(mut handler) = self.handlers.remove(&id) {
            handler(self, id);
            // The handler may have detached its own node
            if self.nodes[id].attached {
                let _ = self.handlers.entry(id).or_insert(handler);
            }
        }
        Ok(())
    }
}
