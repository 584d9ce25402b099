//! Registry views: concurrent maps from namespace name to namespace.
//!
//! The root registry and every isolated view share this type. Entries hold
//! namespaces by reference, so copying an entry between views never copies
//! the namespace itself.

use std::sync::Arc;

use dashmap::DashMap;
use nsfork_common::types::{Symbol, ViewId};

use crate::namespace::Namespace;

/// A mapping from namespace name to namespace object.
///
/// All operations are individually atomic and safe to call concurrently.
/// No atomicity is provided across several operations.
#[derive(Debug)]
pub struct RegistryView {
    id: ViewId,
    entries: DashMap<Symbol, Arc<Namespace>>,
}

impl RegistryView {
    /// Creates an empty view with a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(ViewId::generate())
    }

    /// Creates an empty view with the given identifier.
    #[must_use]
    pub fn with_id(id: ViewId) -> Self {
        Self {
            id,
            entries: DashMap::new(),
        }
    }

    /// Returns the view's identifier.
    #[must_use]
    pub const fn id(&self) -> &ViewId {
        &self.id
    }

    /// Returns every namespace in the view, in no particular order.
    #[must_use]
    pub fn values(&self) -> Vec<Arc<Namespace>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Returns the namespace registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Namespace>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Inserts `ns` under `name` unless the name is already taken.
    ///
    /// Returns the namespace that ends up registered, which is an existing
    /// entry if another caller won the race. Callers must use the returned
    /// namespace, not their own.
    pub fn put_if_absent(&self, name: impl Into<Symbol>, ns: Arc<Namespace>) -> Arc<Namespace> {
        let entry = self.entries.entry(name.into()).or_insert(ns);
        Arc::clone(entry.value())
    }

    /// Removes and returns the namespace registered under `name`.
    pub fn remove(&self, name: &str) -> Option<Arc<Namespace>> {
        self.entries.remove(name).map(|(_, ns)| ns)
    }

    /// Returns `true` if `name` is registered in this view.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<Symbol> {
        let mut names: Vec<Symbol> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Returns the number of registered namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no namespace is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the entries for `names` out of `source` into this view.
    ///
    /// Names missing from `source` are skipped and names already present
    /// here are kept. Returns the number of entries copied.
    pub fn seed_from<'a, I>(&self, source: &Self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a Symbol>,
    {
        let mut copied = 0;
        for name in names {
            if let Some(ns) = source.get(name.as_str()) {
                if !self.contains(name.as_str()) {
                    copied += 1;
                }
                let _ = self.put_if_absent(name.clone(), ns);
            } else {
                tracing::trace!(view = %self.id, namespace = %name, "not in source view, skipped");
            }
        }
        copied
    }
}

impl Default for RegistryView {
    fn default() -> Self {
        Self::new()
    }
}
