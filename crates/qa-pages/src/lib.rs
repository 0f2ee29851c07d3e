//! Page objects for the project screens exercised by end-to-end tests.
//!
//! Each page borrows a [`pagebind::Session`] for the duration of a test step
//! and is dropped afterwards; pages hold no state of their own beyond their
//! element registry.

#![warn(missing_docs)]

pub mod project;

pub use project::settings::ProtectedBranches;
