//! Project settings pages

pub mod protected_branches;

pub use protected_branches::ProtectedBranches;
