//! Element Registry
//!
//! The fixed vocabulary of interactive elements for one page, grouped by the
//! view template each element is rendered from.
//!
//! A registry is built once when the page object is constructed. Every
//! declaration is validated up front, so a misspelled or duplicated name
//! fails the test at setup rather than halfway through a scenario.
//!
//! # Example
//!
//! ```ignore
//! let registry = ElementRegistry::builder()
//!     .view("app/views/projects/protected_branches/shared/_dropdown.html.haml", [
//!         "protected_branch_select",
//!         "protected_branch_dropdown",
//!     ])
//!     .build()?;
//!
//! let selector = registry.resolve("protected_branch_select")?;
//! ```

use regex::Regex;
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::result::{PageError, PageResult};
use crate::selector::{Selector, SelectorConvention};

/// Symbolic identifier of an interactive element
///
/// Lowercase ASCII letters, digits and underscores, starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementName(String);

impl ElementName {
    /// Validate and wrap a name
    pub fn new(name: impl Into<String>) -> PageResult<Self> {
        let name = name.into();
        let reject = |reason: &str| PageError::InvalidElementName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        let mut chars = name.chars();
        match chars.next() {
            None => return Err(reject("name is empty")),
            Some(c) if !c.is_ascii_lowercase() => {
                return Err(reject("must start with a lowercase ASCII letter"));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(reject(
                "only lowercase ASCII letters, digits and underscores are allowed",
            ));
        }

        Ok(Self(name))
    }

    /// The name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElementName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ElementName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A view template and the element names it introduces, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewBinding {
    view: String,
    elements: Vec<ElementName>,
}

impl ViewBinding {
    /// Template path this binding traces back to
    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Element names declared against the view
    #[must_use]
    pub fn elements(&self) -> &[ElementName] {
        &self.elements
    }

    /// Declared elements that do not appear in the template source
    ///
    /// An element counts as present when its name, or its hyphenated form,
    /// occurs as a whole token (`protected_branch_select`,
    /// `qa-protected-branch-select`).
    #[must_use]
    pub fn missing_in(&self, source: &str) -> Vec<ElementName> {
        self.elements
            .iter()
            .filter(|name| element_pattern(name).map_or(true, |re| !re.is_match(source)))
            .cloned()
            .collect()
    }
}

fn element_pattern(name: &ElementName) -> Option<Regex> {
    let underscored = regex::escape(name.as_str());
    let hyphenated = regex::escape(&name.as_str().replace('_', "-"));
    Regex::new(&format!(
        r"(?:^|[^A-Za-z0-9_])(?:{underscored}|{hyphenated})(?:$|[^A-Za-z0-9_-])"
    ))
    .ok()
}

/// Static name-to-selector mapping for one page object
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    convention: SelectorConvention,
    views: Vec<ViewBinding>,
    index: HashMap<ElementName, usize>,
}

impl ElementRegistry {
    /// Create an empty registry using the given convention
    #[must_use]
    pub fn new(convention: SelectorConvention) -> Self {
        Self {
            convention,
            views: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Start a fluent registry definition
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Register a batch of names under a view
    ///
    /// The batch is applied atomically: if any name is invalid or already
    /// declared, nothing is registered. Declaring the same view twice appends
    /// to its binding.
    pub fn declare<I, S>(&mut self, view: impl Into<String>, names: I) -> PageResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let view = view.into();
        let mut batch = Vec::new();
        let mut seen = HashSet::new();

        for raw in names {
            let name = ElementName::new(raw)?;
            if let Some(&idx) = self.index.get(name.as_str()) {
                return Err(PageError::DuplicateElement {
                    name: name.to_string(),
                    view,
                    previous_view: self.views[idx].view.clone(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(PageError::DuplicateElement {
                    name: name.to_string(),
                    view: view.clone(),
                    previous_view: view,
                });
            }
            batch.push(name);
        }

        let idx = match self.views.iter().position(|b| b.view == view) {
            Some(idx) => idx,
            None => {
                self.views.push(ViewBinding {
                    view,
                    elements: Vec::new(),
                });
                self.views.len() - 1
            }
        };

        tracing::trace!(view = %self.views[idx].view, count = batch.len(), "declared elements");
        for name in batch {
            let _ = self.index.insert(name.clone(), idx);
            self.views[idx].elements.push(name);
        }
        Ok(())
    }

    /// Resolve a declared name to its selector
    pub fn resolve(&self, name: &str) -> PageResult<Selector> {
        let (name, _) = self
            .index
            .get_key_value(name)
            .ok_or_else(|| PageError::unknown_element(name))?;
        Ok(self.convention.derive(name))
    }

    /// Check if a name has been declared
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// View template a name was declared against
    #[must_use]
    pub fn view_of(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&idx| self.views[idx].view.as_str())
    }

    /// All view bindings, in first-declaration order
    #[must_use]
    pub fn views(&self) -> &[ViewBinding] {
        &self.views
    }

    /// All declared names, grouped by view in declaration order
    pub fn names(&self) -> impl Iterator<Item = &ElementName> {
        self.views.iter().flat_map(|b| b.elements.iter())
    }

    /// Number of declared names
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if nothing has been declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Convention used to derive selectors
    #[must_use]
    pub const fn convention(&self) -> &SelectorConvention {
        &self.convention
    }

    /// Check every bound template under `root` for its declared elements
    ///
    /// Missing template files and missing elements are reported, not raised;
    /// only unreadable files (other than not-found) produce an error.
    pub fn validate_templates(&self, root: &Path) -> PageResult<ValidationReport> {
        let mut report = ValidationReport::default();

        for binding in &self.views {
            let path = root.join(&binding.view);
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(view = %binding.view, "template not found");
                    report.issues.push(ViewIssue::MissingTemplate { path });
                    continue;
                }
                Err(e) => {
                    return Err(PageError::TemplateValidation {
                        view: binding.view.clone(),
                        message: e.to_string(),
                    })
                }
            };

            let missing = binding.missing_in(&source);
            if !missing.is_empty() {
                tracing::warn!(view = %binding.view, missing = missing.len(), "elements missing from template");
                report.issues.push(ViewIssue::MissingElements {
                    view: binding.view.clone(),
                    elements: missing,
                });
            }
            report.checked += 1;
        }

        Ok(report)
    }
}

/// Fluent registry definition that reports the first error at `build()`
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    convention: SelectorConvention,
    views: Vec<(String, Vec<String>)>,
}

impl RegistryBuilder {
    /// Set the selector convention
    #[must_use]
    pub fn with_convention(mut self, convention: SelectorConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Declare a batch of names under a view
    #[must_use]
    pub fn view<I, S>(mut self, view: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.views
            .push((view.into(), names.into_iter().map(Into::into).collect()));
        self
    }

    /// Build the registry, failing on the first declaration error
    pub fn build(self) -> PageResult<ElementRegistry> {
        let mut registry = ElementRegistry::new(self.convention);
        for (view, names) in self.views {
            registry.declare(view, names)?;
        }
        Ok(registry)
    }
}

/// Problem found while checking templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIssue {
    /// Template file does not exist
    MissingTemplate {
        /// Path that was looked up
        path: PathBuf,
    },
    /// Template exists but lacks some declared elements
    MissingElements {
        /// View template path
        view: String,
        /// Names not found in the source
        elements: Vec<ElementName>,
    },
}

/// Outcome of [`ElementRegistry::validate_templates`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Templates that were read
    pub checked: usize,
    /// Problems found
    pub issues: Vec<ViewIssue>,
}

impl ValidationReport {
    /// No issues were found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} template(s) checked, {} issue(s)",
            self.checked,
            self.issues.len()
        )?;
        for issue in &self.issues {
            match issue {
                ViewIssue::MissingTemplate { path } => {
                    writeln!(f, "  missing template: {}", path.display())?;
                }
                ViewIssue::MissingElements { view, elements } => {
                    let names: Vec<&str> = elements.iter().map(ElementName::as_str).collect();
                    writeln!(f, "  {view}: missing {}", names.join(", "))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const DROPDOWN_VIEW: &str = "app/views/projects/protected_branches/shared/_dropdown.html.haml";
    const LIST_VIEW: &str = "app/views/projects/protected_branches/shared/_branches_list.html.haml";

    fn sample() -> ElementRegistry {
        ElementRegistry::builder()
            .view(
                DROPDOWN_VIEW,
                ["protected_branch_select", "protected_branch_dropdown"],
            )
            .view(LIST_VIEW, ["protected_branches_list"])
            .build()
            .unwrap()
    }

    mod element_name_tests {
        use super::*;

        #[test]
        fn test_valid_names() {
            for name in ["a", "protected_branch_select", "row2", "x_1_y"] {
                assert!(ElementName::new(name).is_ok(), "{name}");
            }
        }

        #[test]
        fn test_invalid_names() {
            for name in ["", "Submit", "1st", "_private", "with-dash", "with space"] {
                let err = ElementName::new(name).unwrap_err();
                assert!(
                    matches!(err, PageError::InvalidElementName { .. }),
                    "{name}: {err}"
                );
                assert!(err.is_declaration_error());
            }
        }

        #[test]
        fn test_display_and_borrow() {
            let name = ElementName::new("allowed_to_push").unwrap();
            assert_eq!(name.to_string(), "allowed_to_push");
            let borrowed: &str = name.borrow();
            assert_eq!(borrowed, "allowed_to_push");
        }
    }

    mod declare_tests {
        use super::*;

        #[test]
        fn test_declare_groups_by_view() {
            let registry = sample();
            assert_eq!(registry.len(), 3);
            assert_eq!(registry.views().len(), 2);
            assert_eq!(registry.views()[0].view(), DROPDOWN_VIEW);
            assert_eq!(registry.views()[0].elements().len(), 2);
            assert_eq!(registry.view_of("protected_branches_list"), Some(LIST_VIEW));
        }

        #[test]
        fn test_duplicate_across_views() {
            let err = ElementRegistry::builder()
                .view("a.haml", ["branch_select"])
                .view("b.haml", ["branch_select"])
                .build()
                .unwrap_err();
            match err {
                PageError::DuplicateElement {
                    name,
                    view,
                    previous_view,
                } => {
                    assert_eq!(name, "branch_select");
                    assert_eq!(view, "b.haml");
                    assert_eq!(previous_view, "a.haml");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_duplicate_within_batch() {
            let mut registry = ElementRegistry::default();
            let err = registry.declare("a.haml", ["row", "row"]).unwrap_err();
            assert!(matches!(err, PageError::DuplicateElement { .. }));
        }

        #[test]
        fn test_failed_batch_is_atomic() {
            let mut registry = sample();
            let err = registry
                .declare("c.haml", ["fresh_name", "protected_branch_select"])
                .unwrap_err();
            assert!(err.is_declaration_error());
            assert!(!registry.contains("fresh_name"));
            assert_eq!(registry.views().len(), 2);
        }

        #[test]
        fn test_same_view_appends() {
            let mut registry = ElementRegistry::default();
            registry.declare("a.haml", ["one"]).unwrap();
            registry.declare("a.haml", ["two"]).unwrap();
            assert_eq!(registry.views().len(), 1);
            let names: Vec<&str> = registry.names().map(ElementName::as_str).collect();
            assert_eq!(names, ["one", "two"]);
        }

        #[test]
        fn test_invalid_name_rejected() {
            let err = ElementRegistry::builder()
                .view("a.haml", ["Bad-Name"])
                .build()
                .unwrap_err();
            assert!(matches!(err, PageError::InvalidElementName { .. }));
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_resolve_declared() {
            let registry = sample();
            let sel = registry.resolve("protected_branch_select").unwrap();
            assert_eq!(
                sel,
                Selector::attribute("data-qa-selector", "protected_branch_select")
            );
        }

        #[test]
        fn test_resolve_unknown() {
            let registry = sample();
            let err = registry.resolve("protect_button").unwrap_err();
            assert!(matches!(err, PageError::UnknownElement { ref name } if name == "protect_button"));
        }

        #[test]
        fn test_resolve_with_class_convention() {
            let registry = ElementRegistry::builder()
                .with_convention(SelectorConvention::class_prefix())
                .view(LIST_VIEW, ["protected_branch_name"])
                .build()
                .unwrap();
            assert_eq!(
                registry.resolve("protected_branch_name").unwrap(),
                Selector::class("qa-protected-branch-name")
            );
        }
    }

    mod template_tests {
        use super::*;

        #[test]
        fn test_missing_in_matches_whole_tokens() {
            let registry = sample();
            let binding = &registry.views()[0];
            let source = "= dropdown_tag('Select', options: { dropdown_class: 'qa-protected-branch-dropdown' })\n\
                          %button{ data: { qa_selector: 'protected_branch_select_wide' } }";
            let missing = binding.missing_in(source);
            assert_eq!(missing.len(), 1);
            assert_eq!(missing[0].as_str(), "protected_branch_select");
        }

        #[test]
        fn test_validate_templates_reports_issues() {
            let dir = tempfile::tempdir().unwrap();
            let dropdown = dir.path().join(DROPDOWN_VIEW);
            std::fs::create_dir_all(dropdown.parent().unwrap()).unwrap();
            std::fs::write(
                &dropdown,
                "%div{ data: { qa_selector: 'protected_branch_select' } }\n\
                 .dropdown-menu.qa-protected-branch-dropdown\n",
            )
            .unwrap();

            let report = sample().validate_templates(dir.path()).unwrap();
            assert_eq!(report.checked, 1);
            assert!(!report.is_clean());
            assert_eq!(report.issues.len(), 1);
            assert!(matches!(
                &report.issues[0],
                ViewIssue::MissingTemplate { path } if path.ends_with("_branches_list.html.haml")
            ));
            assert!(report.to_string().contains("missing template"));
        }

        #[test]
        fn test_validate_templates_clean() {
            let dir = tempfile::tempdir().unwrap();
            let registry = ElementRegistry::builder()
                .view("_row.html.haml", ["protected_branch_name"])
                .build()
                .unwrap();
            std::fs::write(
                dir.path().join("_row.html.haml"),
                "%span.ref-name.qa-protected-branch-name= protected_branch.name\n",
            )
            .unwrap();

            let report = registry.validate_templates(dir.path()).unwrap();
            assert!(report.is_clean());
            assert_eq!(report.checked, 1);
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_resolve_is_pure(name in "[a-z][a-z0-9_]{0,24}") {
                let registry = ElementRegistry::builder()
                    .view("view.haml", [name.clone()])
                    .build()
                    .unwrap();
                let first = registry.resolve(&name).unwrap();
                let second = registry.resolve(&name).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn prop_undeclared_is_unknown(name in "[a-z][a-z0-9_]{0,24}") {
                let registry = ElementRegistry::builder()
                    .view("view.haml", ["declared_zz_sentinel"])
                    .build()
                    .unwrap();
                prop_assume!(name != "declared_zz_sentinel");
                let is_unknown = matches!(
                    registry.resolve(&name),
                    Err(PageError::UnknownElement { .. })
                );
                prop_assert!(is_unknown);
            }

            #[test]
            fn prop_redeclare_is_duplicate(name in "[a-z][a-z0-9_]{0,24}") {
                let mut registry = ElementRegistry::default();
                registry.declare("a.haml", [name.clone()]).unwrap();
                let is_duplicate = matches!(
                    registry.declare("b.haml", [name]),
                    Err(PageError::DuplicateElement { .. })
                );
                prop_assert!(is_duplicate);
            }
        }
    }
}
