//! Selector model and the naming convention that derives selectors from
//! element names.
//!
//! # Design Philosophy
//!
//! - **Attribute-based**: elements are found through stable test attributes,
//!   never through layout or styling classes
//! - **Derived, not stored**: a selector is a pure function of an element
//!   name and the active convention

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::registry::ElementName;

/// Default attribute used by [`SelectorConvention::DataAttribute`]
pub const DEFAULT_SELECTOR_ATTRIBUTE: &str = "data-qa-selector";

/// Default prefix used by [`SelectorConvention::ClassPrefix`]
pub const DEFAULT_CLASS_PREFIX: &str = "qa-";

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Attribute equality match (e.g. `[data-qa-selector="protected_branch_select"]`)
    Attribute {
        /// Attribute name
        name: String,
        /// Exact attribute value
        value: String,
    },
    /// Class match (e.g. `.qa-protected-branch-name`)
    Class(String),
    /// Link or button whose trimmed visible text equals the string
    Text(String),
}

impl Selector {
    /// Create an attribute selector
    #[must_use]
    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a class selector
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Create a visible-text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// CSS form of the selector, when one exists
    ///
    /// Text selectors have no CSS equivalent and return `None`.
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Attribute { name, value } => Some(format!("[{name}=\"{}\"]", css_escape(value))),
            Self::Class(class) => Some(format!(".{class}")),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute { name, value } => write!(f, "[{name}=\"{}\"]", css_escape(value)),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Text(text) => write!(f, "text=\"{}\"", css_escape(text)),
        }
    }
}

/// Quote a value for a double-quoted CSS string
///
/// Only `"` and `\` need escaping; everything else is kept verbatim.
fn css_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Rule that turns an [`ElementName`] into a [`Selector`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectorConvention {
    /// `[<attribute>="<name>"]`, name used verbatim
    DataAttribute {
        /// Attribute carrying the element name
        attribute: String,
    },
    /// `.<prefix><name-with-hyphens>`, the legacy class form
    ClassPrefix {
        /// Class prefix
        prefix: String,
    },
}

impl Default for SelectorConvention {
    fn default() -> Self {
        Self::data_attribute()
    }
}

impl SelectorConvention {
    /// Data-attribute convention with the default attribute
    #[must_use]
    pub fn data_attribute() -> Self {
        Self::DataAttribute {
            attribute: DEFAULT_SELECTOR_ATTRIBUTE.to_string(),
        }
    }

    /// Class-prefix convention with the default prefix
    #[must_use]
    pub fn class_prefix() -> Self {
        Self::ClassPrefix {
            prefix: DEFAULT_CLASS_PREFIX.to_string(),
        }
    }

    /// Derive the selector for an element name
    #[must_use]
    pub fn derive(&self, name: &ElementName) -> Selector {
        match self {
            Self::DataAttribute { attribute } => Selector::attribute(attribute, name.as_str()),
            Self::ClassPrefix { prefix } => {
                Selector::class(format!("{prefix}{}", name.as_str().replace('_', "-")))
            }
        }
    }
}
