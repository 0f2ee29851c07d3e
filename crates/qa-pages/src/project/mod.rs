//! Project pages

pub mod settings;
