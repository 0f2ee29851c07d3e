//! Page Object Model Support
//!
//! First-class support for the Page Object Model pattern in test automation.
//! A page object owns an [`ElementRegistry`] and borrows a [`Session`]; every
//! helper resolves element names through the registry, so an undeclared
//! name fails before the page is touched.
//!
//! Scoped blocks receive a [`PageScope`], which pairs the registry with the
//! session. Element names keep working inside the block, and nested
//! `within_element` calls see the narrower scope.

use crate::driver::{Driver, ElementHandle};
use crate::registry::ElementRegistry;
use crate::result::{PageError, PageResult};
use crate::selector::Selector;
use crate::session::Session;

/// Trait for page objects representing a page or component in the UI.
///
/// Implementors supply the registry and the session; the provided methods
/// are the interaction helpers page actions are written with.
///
/// # Example
///
/// ```ignore
/// struct LoginPage<'s, D: Driver> {
///     session: &'s mut Session<D>,
///     registry: ElementRegistry,
/// }
///
/// impl<D: Driver> PageObject<D> for LoginPage<'_, D> {
///     fn registry(&self) -> &ElementRegistry { &self.registry }
///     fn session(&self) -> &Session<D> { &*self.session }
///     fn session_mut(&mut self) -> &mut Session<D> { &mut *self.session }
///     fn scope(&mut self) -> PageScope<'_, D> {
///         PageScope::new(&self.registry, &mut *self.session)
///     }
/// }
///
/// impl<D: Driver> LoginPage<'_, D> {
///     pub fn sign_in(&mut self) -> PageResult<()> {
///         self.within_element("login_form", |form| form.click_element("sign_in_button"))
///     }
/// }
/// ```
pub trait PageObject<D: Driver> {
    /// Element vocabulary of the page
    fn registry(&self) -> &ElementRegistry;

    /// Session the page interacts through
    fn session(&self) -> &Session<D>;

    /// Session the page interacts through, mutably
    fn session_mut(&mut self) -> &mut Session<D>;

    /// Registry and session borrowed together
    fn scope(&mut self) -> PageScope<'_, D>;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Selector for a declared element
    fn selector(&self, name: &str) -> PageResult<Selector> {
        self.registry().resolve(name)
    }

    /// Click the unique element declared as `name`
    fn click_element(&mut self, name: &str) -> PageResult<()> {
        tracing::debug!(page = self.page_name(), element = name, "click_element");
        self.scope().click_element(name)
    }

    /// Run `f` with lookups restricted to the element declared as `name`
    ///
    /// The previous scope is restored when `f` returns, fails or panics.
    fn within_element<T, F>(&mut self, name: &str, f: F) -> PageResult<T>
    where
        F: FnOnce(&mut PageScope<'_, D>) -> PageResult<T>,
    {
        self.scope().within_element(name, f)
    }

    /// All elements declared as `name` in the current scope, in document order
    fn all_elements(&self, name: &str) -> PageResult<Vec<ElementHandle>> {
        let selector = self.selector(name)?;
        self.session().find_all(&selector)
    }

    /// Last element declared as `item` inside the element declared as `container`
    ///
    /// "Last" is the final match in document order at query time. An empty
    /// container yields `Ok(None)`.
    fn last_within(&mut self, container: &str, item: &str) -> PageResult<Option<ElementHandle>> {
        self.scope().last_within(container, item)
    }

    /// Click the option labelled `text` inside the dropdown declared as `dropdown`
    ///
    /// A dropdown without such an option is [`PageError::OptionNotFound`].
    fn choose_option(&mut self, dropdown: &str, text: &str) -> PageResult<()> {
        self.scope().choose_option(dropdown, text)
    }
}

/// A page's registry and session, borrowed for one interaction
///
/// Handed to `within_element` blocks so they can keep addressing elements by
/// name.
#[derive(Debug)]
pub struct PageScope<'a, D: Driver> {
    registry: &'a ElementRegistry,
    session: &'a mut Session<D>,
}

impl<'a, D: Driver> PageScope<'a, D> {
    /// Pair a registry with a session
    pub fn new(registry: &'a ElementRegistry, session: &'a mut Session<D>) -> Self {
        Self { registry, session }
    }

    /// Element vocabulary in use
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        self.registry
    }

    /// Underlying session
    #[must_use]
    pub fn session(&self) -> &Session<D> {
        &*self.session
    }

    /// Underlying session, mutably
    pub fn session_mut(&mut self) -> &mut Session<D> {
        &mut *self.session
    }

    /// Selector for a declared element
    pub fn selector(&self, name: &str) -> PageResult<Selector> {
        self.registry.resolve(name)
    }

    /// Click the unique element declared as `name` in the current scope
    pub fn click_element(&mut self, name: &str) -> PageResult<()> {
        let selector = self.selector(name)?;
        self.session.click(&selector)
    }

    /// Click the link or button whose visible text is `text`
    pub fn click_on(&mut self, text: &str) -> PageResult<()> {
        self.session.click_on(text)
    }

    /// All elements declared as `name` in the current scope, in document order
    pub fn all_elements(&self, name: &str) -> PageResult<Vec<ElementHandle>> {
        let selector = self.selector(name)?;
        self.session.find_all(&selector)
    }

    /// Run `f` with lookups restricted to the element declared as `name`
    pub fn within_element<T, F>(&mut self, name: &str, f: F) -> PageResult<T>
    where
        F: FnOnce(&mut PageScope<'_, D>) -> PageResult<T>,
    {
        let selector = self.selector(name)?;
        let registry = self.registry;
        self.session
            .within(&selector, |session| f(&mut PageScope::new(registry, session)))
    }

    /// Last element declared as `item` inside the element declared as `container`
    pub fn last_within(&mut self, container: &str, item: &str) -> PageResult<Option<ElementHandle>> {
        // an undeclared item fails before the container is entered
        let _ = self.selector(item)?;
        self.within_element(container, |list| Ok(list.all_elements(item)?.pop()))
    }

    /// Click the option labelled `text` inside the dropdown declared as `dropdown`
    ///
    /// Only a missing option becomes [`PageError::OptionNotFound`]; a failed
    /// click on an option that exists is returned unchanged.
    pub fn choose_option(&mut self, dropdown: &str, text: &str) -> PageResult<()> {
        self.within_element(dropdown, |menu| {
            let option = menu
                .session
                .find(&Selector::text(text))
                .map_err(|err| match err {
                    PageError::ElementNotFound { .. } => PageError::option_not_found(text, dropdown),
                    other => other,
                })?;
            menu.session.click_handle(&option)
        })
    }
}
