//! Opaque handles to isolated registry views.

use std::sync::Arc;

use nsfork_common::types::{Symbol, ViewId};
use nsfork_core::{Namespace, RegistryView};

/// An immutable reference to a registry view that can be entered.
///
/// Handles are produced by `enter` or built explicitly, and consumed by
/// `enter_with`. Cloning a handle shares the view; it never copies it.
#[derive(Debug, Clone)]
pub struct ContextHandle {
    view: Arc<RegistryView>,
}

impl ContextHandle {
    /// Wraps an already populated view.
    #[must_use]
    pub fn new(view: RegistryView) -> Self {
        Self {
            view: Arc::new(view),
        }
    }

    /// Builds a view holding the given namespaces under their own names.
    pub fn from_namespaces<I>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = Arc<Namespace>>,
    {
        let view = RegistryView::new();
        for ns in namespaces {
            let _ = view.put_if_absent(ns.name().clone(), ns);
        }
        Self::new(view)
    }

    pub(crate) const fn from_shared(view: Arc<RegistryView>) -> Self {
        Self { view }
    }

    pub(crate) fn view(&self) -> Arc<RegistryView> {
        Arc::clone(&self.view)
    }

    /// Returns the identifier of the wrapped view.
    #[must_use]
    pub fn view_id(&self) -> &ViewId {
        self.view.id()
    }

    /// Returns `true` if the view maps `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.view.contains(name)
    }

    /// Returns the names mapped in the view, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<Symbol> {
        self.view.names()
    }

    /// Returns the number of namespaces in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Returns `true` if the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Returns `true` if both handles wrap the same view.
    #[must_use]
    pub fn same_view(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.view, &other.view)
    }
}
