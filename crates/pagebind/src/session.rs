//! Scoped interaction session
//!
//! A [`Session`] wraps a [`Driver`] and an explicit stack of scopes. Lookups
//! always run inside the innermost scope. [`Session::within`] enters a scope
//! through a [`ScopeGuard`], and dropping the guard restores the previous
//! scope, whether the block returned, failed, or panicked.

use std::ops::{Deref, DerefMut};

use crate::config::PageConfig;
use crate::driver::{Driver, ElementHandle};
use crate::result::{PageError, PageResult};
use crate::selector::Selector;

/// Driver plus the scope stack of the current test step
#[derive(Debug)]
pub struct Session<D: Driver> {
    driver: D,
    config: PageConfig,
    scopes: Vec<ElementHandle>,
}

impl<D: Driver> Session<D> {
    /// Create a session with the default configuration
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, PageConfig::default())
    }

    /// Create a session with an explicit configuration
    pub fn with_config(driver: D, config: PageConfig) -> Self {
        Self {
            driver,
            config,
            scopes: Vec::new(),
        }
    }

    /// Session configuration
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// The wrapped driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The wrapped driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consume the session and return the driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Innermost active scope, `None` at document level
    pub fn current_scope(&self) -> Option<&ElementHandle> {
        self.scopes.last()
    }

    /// Number of nested scopes currently active
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    fn scope_label(&self) -> String {
        self.scopes.last().map_or_else(
            || "document".to_string(),
            |scope| format!("{}#{}", scope.tag_name, scope.id),
        )
    }

    /// All elements matching `selector` in the current scope, in document order
    pub fn find_all(&self, selector: &Selector) -> PageResult<Vec<ElementHandle>> {
        let found = self.driver.query_all(self.scopes.last(), selector)?;
        tracing::trace!(%selector, matches = found.len(), depth = self.scopes.len(), "find_all");
        Ok(found)
    }

    /// The single element matching `selector` in the current scope
    ///
    /// Zero matches is [`PageError::ElementNotFound`]. Several matches is
    /// [`PageError::AmbiguousElement`] in strict mode, otherwise the first
    /// match wins.
    pub fn find(&self, selector: &Selector) -> PageResult<ElementHandle> {
        let mut found = self.find_all(selector)?;
        match found.len() {
            0 => Err(PageError::not_found(selector, self.scope_label())),
            1 => Ok(found.swap_remove(0)),
            count if self.config.strict => Err(PageError::AmbiguousElement {
                selector: selector.to_string(),
                count,
                scope: self.scope_label(),
            }),
            _ => Ok(found.swap_remove(0)),
        }
    }

    /// Click the single element matching `selector`
    pub fn click(&mut self, selector: &Selector) -> PageResult<()> {
        let element = self.find(selector)?;
        if self.config.log_interactions {
            tracing::debug!(%selector, scope = %self.scope_label(), "click");
        }
        self.driver.click(&element)
    }

    /// Click an element that was already located; driver errors pass through
    pub fn click_handle(&mut self, element: &ElementHandle) -> PageResult<()> {
        if self.config.log_interactions {
            tracing::debug!(element = %element.id, scope = %self.scope_label(), "click");
        }
        self.driver.click(element)
    }

    /// Click the link or button whose visible text is `text`
    pub fn click_on(&mut self, text: &str) -> PageResult<()> {
        self.click(&Selector::text(text))
    }

    /// Make the element matching `selector` the active scope until the guard drops
    pub fn enter(&mut self, selector: &Selector) -> PageResult<ScopeGuard<'_, D>> {
        let element = self.find(selector)?;
        let restore_to = self.scopes.len();
        if self.config.log_interactions {
            tracing::debug!(%selector, depth = restore_to + 1, "enter scope");
        }
        self.scopes.push(element);
        Ok(ScopeGuard {
            session: self,
            restore_to,
        })
    }

    /// Run `f` with lookups restricted to the subtree of the element matching `selector`
    ///
    /// The result or error of `f` is returned unchanged.
    pub fn within<T, F>(&mut self, selector: &Selector, f: F) -> PageResult<T>
    where
        F: FnOnce(&mut Self) -> PageResult<T>,
    {
        let mut guard = self.enter(selector)?;
        f(&mut *guard)
    }
}

/// Active scope; the previous scope comes back when this is dropped
#[derive(Debug)]
pub struct ScopeGuard<'a, D: Driver> {
    session: &'a mut Session<D>,
    restore_to: usize,
}

impl<D: Driver> Deref for ScopeGuard<'_, D> {
    type Target = Session<D>;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl<D: Driver> DerefMut for ScopeGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl<D: Driver> Drop for ScopeGuard<'_, D> {
    fn drop(&mut self) {
        self.session.scopes.truncate(self.restore_to);
        if self.session.config.log_interactions {
            tracing::debug!(depth = self.restore_to, "leave scope");
        }
    }
}
