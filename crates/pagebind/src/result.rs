//! Result and error types for Pagebind.
//!
//! Errors fall into two families:
//!
//! - **Declaration errors** describe a broken page object definition
//!   (unknown or duplicate element names). They are bugs, never recovered.
//! - **Interaction errors** come from the live page not matching what the
//!   page object expects. They propagate unchanged to the calling test step.

use thiserror::Error;

/// Result type for Pagebind operations
pub type PageResult<T> = Result<T, PageError>;

/// Errors that can occur in Pagebind
#[derive(Debug, Error)]
pub enum PageError {
    /// Element name was never declared in the page's registry
    #[error("Unknown element `{name}`: not declared in any view of this page")]
    UnknownElement {
        /// The undeclared name
        name: String,
    },

    /// Element name declared twice in the same registry
    #[error("Element `{name}` declared in `{view}` was already declared in `{previous_view}`")]
    DuplicateElement {
        /// The duplicated name
        name: String,
        /// View of the second declaration
        view: String,
        /// View of the first declaration
        previous_view: String,
    },

    /// Element name does not follow the naming rules
    #[error("Invalid element name `{name}`: {reason}")]
    InvalidElementName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// No element matched a selector in the active scope
    #[error("Element not found: {selector} (scope: {scope})")]
    ElementNotFound {
        /// Rendered selector
        selector: String,
        /// Description of the active scope
        scope: String,
    },

    /// More than one element matched where a unique element was required
    #[error("Ambiguous match: {selector} matched {count} elements (scope: {scope})")]
    AmbiguousElement {
        /// Rendered selector
        selector: String,
        /// Number of matches
        count: usize,
        /// Description of the active scope
        scope: String,
    },

    /// A dropdown did not offer the requested option
    #[error("Option `{text}` not found in dropdown `{dropdown}`")]
    OptionNotFound {
        /// Visible text of the requested option
        text: String,
        /// Element name of the dropdown
        dropdown: String,
    },

    /// Element handle no longer refers to a node in the page
    #[error("Stale element handle `{id}`")]
    StaleElement {
        /// Handle identifier
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Template validation could not run
    #[error("Template validation failed for `{view}`: {message}")]
    TemplateValidation {
        /// View template path
        view: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PageError {
    /// Create an unknown element error
    #[must_use]
    pub fn unknown_element(name: impl Into<String>) -> Self {
        Self::UnknownElement { name: name.into() }
    }

    /// Create an element-not-found error
    #[must_use]
    pub fn not_found(selector: impl ToString, scope: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.to_string(),
            scope: scope.into(),
        }
    }

    /// Create an option-not-found error
    #[must_use]
    pub fn option_not_found(text: impl Into<String>, dropdown: impl Into<String>) -> Self {
        Self::OptionNotFound {
            text: text.into(),
            dropdown: dropdown.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Misuse of a page definition; always a bug in the page object itself
    #[must_use]
    pub const fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownElement { .. }
                | Self::DuplicateElement { .. }
                | Self::InvalidElementName { .. }
        )
    }

    /// The live page did not match the page object's expectations
    #[must_use]
    pub const fn is_interaction_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::AmbiguousElement { .. }
                | Self::OptionNotFound { .. }
                | Self::StaleElement { .. }
        )
    }
}
