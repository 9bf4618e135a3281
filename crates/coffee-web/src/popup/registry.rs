//! Handler table behind the page's global entry points.
//!
//! Inline markup (`onclick="copyProductInfoToEditPopup(...)"`) can only
//! reach functions through a global name. Each [`Role`] owns one such name,
//! and the global forwards to whatever handler is bound for that role.

use std::collections::HashMap;

use super::MissingElement;

/// The part an element plays when it triggers a bound handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A product card asking for the edit popup.
    ProductCard,
}

impl Role {
    /// Name the handler is published under for inline event attributes.
    pub const fn global_name(self) -> &'static str {
        match self {
            Role::ProductCard => "copyProductInfoToEditPopup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("no handler bound for {0:?}")]
    Unbound(Role),
    #[error(transparent)]
    Missing(#[from] MissingElement),
}

type Handler<E> = Box<dyn Fn(&E) -> Result<(), MissingElement>>;

pub struct Bindings<E> {
    handlers: HashMap<Role, Handler<E>>,
}

impl<E> Default for Bindings<E> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<E> Bindings<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `role`. The first binding stays for the page's
    /// lifetime; returns false if the role was already bound.
    pub fn bind<F>(&mut self, role: Role, handler: F) -> bool
    where
        F: Fn(&E) -> Result<(), MissingElement> + 'static,
    {
        if self.handlers.contains_key(&role) {
            return false;
        }
        self.handlers.insert(role, Box::new(handler));
        true
    }

    pub fn is_bound(&self, role: Role) -> bool {
        self.handlers.contains_key(&role)
    }

    pub fn dispatch(&self, role: Role, element: &E) -> Result<(), BindingError> {
        let handler = self.handlers.get(&role).ok_or(BindingError::Unbound(role))?;
        handler(element)?;
        Ok(())
    }
}
