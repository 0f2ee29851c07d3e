//! Session configuration
//!
//! Defaults suit pages annotated with `data-qa-selector` attributes. A YAML
//! file or environment variables can switch the convention (for instance to
//! the legacy `qa-` class prefix) or relax the uniqueness policy.
//!
//! ```yaml
//! convention:
//!   kind: class_prefix
//!   prefix: qa-
//! strict: true
//! log_interactions: false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::{PageError, PageResult};
use crate::selector::SelectorConvention;

/// Overrides [`SelectorConvention::DataAttribute`]'s attribute
pub const ENV_SELECTOR_ATTRIBUTE: &str = "PAGEBIND_SELECTOR_ATTRIBUTE";

/// Switches to [`SelectorConvention::ClassPrefix`] with the given prefix
pub const ENV_CLASS_PREFIX: &str = "PAGEBIND_CLASS_PREFIX";

/// Overrides [`PageConfig::strict`]
pub const ENV_STRICT: &str = "PAGEBIND_STRICT";

/// Configuration shared by a session and the page objects built on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// How element names become selectors
    pub convention: SelectorConvention,
    /// Fail when a unique lookup matches several elements
    pub strict: bool,
    /// Emit a debug event for every click and scope change
    pub log_interactions: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            convention: SelectorConvention::default(),
            strict: true,
            log_interactions: true,
        }
    }
}

impl PageConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selector convention
    #[must_use]
    pub fn with_convention(mut self, convention: SelectorConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Set the uniqueness policy
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable interaction events
    #[must_use]
    pub const fn with_log_interactions(mut self, enabled: bool) -> Self {
        self.log_interactions = enabled;
        self
    }

    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> PageResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> PageResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Apply `PAGEBIND_*` variables from the process environment
    pub fn with_env_overrides(self) -> PageResult<Self> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply `PAGEBIND_*` variables from an arbitrary lookup
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> PageResult<Self> {
        match (lookup(ENV_SELECTOR_ATTRIBUTE), lookup(ENV_CLASS_PREFIX)) {
            (Some(_), Some(_)) => {
                return Err(PageError::config(format!(
                    "{ENV_SELECTOR_ATTRIBUTE} and {ENV_CLASS_PREFIX} are mutually exclusive"
                )));
            }
            (Some(attribute), None) => {
                if attribute.trim().is_empty() {
                    return Err(PageError::config(format!("{ENV_SELECTOR_ATTRIBUTE} is empty")));
                }
                self.convention = SelectorConvention::DataAttribute { attribute };
            }
            (None, Some(prefix)) => {
                if prefix.trim().is_empty() {
                    return Err(PageError::config(format!("{ENV_CLASS_PREFIX} is empty")));
                }
                self.convention = SelectorConvention::ClassPrefix { prefix };
            }
            (None, None) => {}
        }

        if let Some(raw) = lookup(ENV_STRICT) {
            self.strict = parse_bool(&raw).ok_or_else(|| {
                PageError::config(format!("{ENV_STRICT} must be true or false, got `{raw}`"))
            })?;
        }

        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
