//! Driver - Abstract Automation Capability
//!
//! Pagebind does not drive a browser itself. It consumes a [`Driver`]: the
//! smallest capability a page object needs from an automation engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PageObject ──► Session (scope stack, uniqueness policy)     │
//! │                    │                                         │
//! │                    ▼                                         │
//! │               Driver trait                                   │
//! │       ┌────────────┴────────────┐                            │
//! │  FixtureDom (in-memory)    external browser engine           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timeouts, retries and waiting for elements belong to the implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::result::PageResult;
use crate::selector::Selector;

/// Element handle for DOM interactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-specific identifier for the node
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Element text content at query time
    pub text_content: Option<String>,
    /// Attributes at query time
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text_content: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Trimmed text content, empty when the node has none
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.as_deref().map_or("", str::trim)
    }

    /// Attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check the `class` attribute for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Automation capability consumed by sessions and page objects
///
/// Calls are blocking: each returns once the underlying UI action completed
/// or the implementation gave up.
pub trait Driver {
    /// All visible elements matching `selector`, in document order
    ///
    /// With a `root`, only its descendants are searched. A root that is no
    /// longer attached yields [`PageError::StaleElement`](crate::PageError::StaleElement).
    fn query_all(
        &self,
        root: Option<&ElementHandle>,
        selector: &Selector,
    ) -> PageResult<Vec<ElementHandle>>;

    /// Click an element previously returned by [`Driver::query_all`]
    fn click(&mut self, element: &ElementHandle) -> PageResult<()>;
}

impl<D: Driver + ?Sized> Driver for &mut D {
    fn query_all(
        &self,
        root: Option<&ElementHandle>,
        selector: &Selector,
    ) -> PageResult<Vec<ElementHandle>> {
        (**self).query_all(root, selector)
    }

    fn click(&mut self, element: &ElementHandle) -> PageResult<()> {
        (**self).click(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_element_handle_creation() {
            let elem = ElementHandle::new("node-1", "button");
            assert_eq!(elem.id, "node-1");
            assert_eq!(elem.tag_name, "button");
            assert!(elem.text_content.is_none());
            assert_eq!(elem.text(), "");
        }

        #[test]
        fn test_text_is_trimmed() {
            let elem = ElementHandle::new("node-2", "span").with_text("\n  main  \n");
            assert_eq!(elem.text(), "main");
        }

        #[test]
        fn test_attributes_and_classes() {
            let elem = ElementHandle::new("node-3", "span")
                .with_attribute("class", "ref-name qa-protected-branch-name")
                .with_attribute("data-qa-selector", "protected_branch_name");
            assert!(elem.has_class("qa-protected-branch-name"));
            assert!(!elem.has_class("qa-protected"));
            assert_eq!(
                elem.attribute("data-qa-selector"),
                Some("protected_branch_name")
            );
            assert!(elem.attribute("id").is_none());
        }
    }
}
