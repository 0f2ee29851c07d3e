//! Pagebind: Page Objects for End-to-End UI Tests
//!
//! Pagebind binds semantic element names to selectors and builds page objects
//! out of two primitives: click an element by name, and run a block scoped to
//! an element's subtree.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PAGEBIND Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Element    │    │ Page       │    │ Session    │            │
//! │   │ Registry   │───►│ Object     │───►│ (scopes)   │──► Driver  │
//! │   │ (names)    │    │ (actions)  │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The driver is any automation engine implementing [`Driver`]; the crate
//! ships [`FixtureDom`], an in-memory document for tests.

#![warn(missing_docs)]

mod config;
mod driver;
mod fixture;
mod logging;
mod page_object;
mod registry;
mod result;
mod selector;
mod session;

pub use config::{PageConfig, ENV_CLASS_PREFIX, ENV_SELECTOR_ATTRIBUTE, ENV_STRICT};
pub use driver::{Driver, ElementHandle};
pub use fixture::{ClickHandler, FixtureDom, NodeId};
pub use logging::{init_logging, init_test_logging, LogFormat, DEFAULT_DIRECTIVE, TEST_DIRECTIVE};
pub use page_object::{PageObject, PageScope};
pub use registry::{
    ElementName, ElementRegistry, RegistryBuilder, ValidationReport, ViewBinding, ViewIssue,
};
pub use result::{PageError, PageResult};
pub use selector::{Selector, SelectorConvention, DEFAULT_CLASS_PREFIX, DEFAULT_SELECTOR_ATTRIBUTE};
pub use session::{ScopeGuard, Session};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        Driver, ElementHandle, ElementName, ElementRegistry, FixtureDom, PageConfig, PageError,
        PageObject, PageResult, PageScope, Selector, SelectorConvention, Session,
    };
}
