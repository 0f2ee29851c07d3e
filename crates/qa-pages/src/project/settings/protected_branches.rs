//! Protected branches settings page
//!
//! Selects a branch, picks who may push to it, protects it, and reads back
//! the newest row of the protected branches list.

use pagebind::{
    Driver, ElementHandle, ElementRegistry, PageObject, PageResult, PageScope, SelectorConvention,
    Session,
};

/// Element names declared by this page
pub mod elements {
    /// Control that opens the branch dropdown
    pub const PROTECTED_BRANCH_SELECT: &str = "protected_branch_select";
    /// Branch dropdown menu
    pub const PROTECTED_BRANCH_DROPDOWN: &str = "protected_branch_dropdown";
    /// Control that opens the push access dropdown
    pub const ALLOWED_TO_PUSH_SELECT: &str = "allowed_to_push_select";
    /// Push access dropdown menu
    pub const ALLOWED_TO_PUSH_DROPDOWN: &str = "allowed_to_push_dropdown";
    /// Table of protected branches
    pub const PROTECTED_BRANCHES_LIST: &str = "protected_branches_list";
    /// Branch name cell of a list row
    pub const PROTECTED_BRANCH_NAME: &str = "protected_branch_name";
    /// Push access cell of a list row
    pub const ALLOWED_TO_PUSH: &str = "allowed_to_push";
}

use elements::{
    ALLOWED_TO_PUSH, ALLOWED_TO_PUSH_DROPDOWN, ALLOWED_TO_PUSH_SELECT, PROTECTED_BRANCHES_LIST,
    PROTECTED_BRANCH_DROPDOWN, PROTECTED_BRANCH_NAME, PROTECTED_BRANCH_SELECT,
};

/// View templates and the elements each one renders
pub const VIEWS: &[(&str, &[&str])] = &[
    (
        "app/views/projects/protected_branches/shared/_dropdown.html.haml",
        &[PROTECTED_BRANCH_SELECT, PROTECTED_BRANCH_DROPDOWN],
    ),
    (
        "app/views/projects/protected_branches/_create_protected_branch.html.haml",
        &[ALLOWED_TO_PUSH_SELECT, ALLOWED_TO_PUSH_DROPDOWN],
    ),
    (
        "app/views/projects/protected_branches/shared/_branches_list.html.haml",
        &[PROTECTED_BRANCHES_LIST],
    ),
    (
        "app/views/projects/protected_branches/shared/_protected_branch.html.haml",
        &[PROTECTED_BRANCH_NAME, ALLOWED_TO_PUSH],
    ),
];

/// Push access option that blocks every push
pub const NO_ONE: &str = "No one";

/// Push access option for developers and maintainers
pub const DEVELOPERS_AND_MASTERS: &str = "Developers + Masters";

/// Label of the submit button
pub const PROTECT: &str = "Protect";

/// Page object for Settings → Repository → Protected branches
#[derive(Debug)]
pub struct ProtectedBranches<'s, D: Driver> {
    session: &'s mut Session<D>,
    registry: ElementRegistry,
}

impl<'s, D: Driver> ProtectedBranches<'s, D> {
    /// Bind the page to a session, using the session's selector convention
    pub fn new(session: &'s mut Session<D>) -> PageResult<Self> {
        let registry = Self::registry_for(session.config().convention.clone())?;
        Ok(Self { session, registry })
    }

    /// The page's element registry under a given convention
    pub fn registry_for(convention: SelectorConvention) -> PageResult<ElementRegistry> {
        VIEWS
            .iter()
            .fold(
                ElementRegistry::builder().with_convention(convention),
                |builder, (view, names)| builder.view(*view, names.iter().copied()),
            )
            .build()
    }

    /// Choose the branch to protect
    pub fn select_branch(&mut self, branch_name: &str) -> PageResult<()> {
        self.click_element(PROTECTED_BRANCH_SELECT)?;
        self.choose_option(PROTECTED_BRANCH_DROPDOWN, branch_name)
    }

    /// Allow nobody to push
    pub fn allow_no_one_to_push(&mut self) -> PageResult<()> {
        self.allow_to_push(NO_ONE)
    }

    /// Allow developers and maintainers to push
    pub fn allow_devs_and_masters_to_push(&mut self) -> PageResult<()> {
        self.allow_to_push(DEVELOPERS_AND_MASTERS)
    }

    /// Submit the protect form
    pub fn protect_branch(&mut self) -> PageResult<()> {
        tracing::info!("protecting branch");
        self.session.click_on(PROTECT)
    }

    /// Branch name cell of the last row in the list, `None` when the list is empty
    pub fn last_branch_name(&mut self) -> PageResult<Option<ElementHandle>> {
        self.last_within(PROTECTED_BRANCHES_LIST, PROTECTED_BRANCH_NAME)
    }

    /// Push access cell of the last row in the list, `None` when the list is empty
    pub fn last_push_allowance(&mut self) -> PageResult<Option<ElementHandle>> {
        self.last_within(PROTECTED_BRANCHES_LIST, ALLOWED_TO_PUSH)
    }

    fn allow_to_push(&mut self, text: &str) -> PageResult<()> {
        self.click_element(ALLOWED_TO_PUSH_SELECT)?;
        self.choose_option(ALLOWED_TO_PUSH_DROPDOWN, text)
    }
}

impl<D: Driver> PageObject<D> for ProtectedBranches<'_, D> {
    fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    fn session(&self) -> &Session<D> {
        &*self.session
    }

    fn session_mut(&mut self) -> &mut Session<D> {
        &mut *self.session
    }

    fn scope(&mut self) -> PageScope<'_, D> {
        PageScope::new(&self.registry, &mut *self.session)
    }

    fn page_name(&self) -> &str {
        "protected_branches"
    }
}
