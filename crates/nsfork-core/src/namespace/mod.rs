//! Namespaces: named containers of bindings.
//!
//! A namespace is created once and then shared by reference between the
//! root registry and every view seeded from it. Mutating a namespace's
//! bindings is therefore visible through every view that holds it.

pub mod binding;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use nsfork_common::types::Symbol;

pub use binding::{Binding, Var};

static NEXT_NAMESPACE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a namespace object.
///
/// Two namespaces with the same name are still distinct objects; sets of
/// namespaces are keyed by this identity, never by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespaceId(u64);

impl NamespaceId {
    fn next() -> Self {
        Self(NEXT_NAMESPACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns#{}", self.0)
    }
}

/// A named mapping from local symbols to bindings.
#[derive(Debug)]
pub struct Namespace {
    id: NamespaceId,
    name: Symbol,
    mappings: DashMap<Symbol, Binding>,
}

impl Namespace {
    /// Creates an empty namespace.
    ///
    /// The namespace is not registered anywhere; registration is the
    /// caller's business.
    #[must_use]
    pub fn new(name: impl Into<Symbol>) -> Arc<Self> {
        let ns = Arc::new(Self {
            id: NamespaceId::next(),
            name: name.into(),
            mappings: DashMap::new(),
        });
        tracing::trace!(namespace = %ns.name, id = %ns.id, "namespace created");
        ns
    }

    /// Returns the namespace's name.
    #[must_use]
    pub const fn name(&self) -> &Symbol {
        &self.name
    }

    /// Returns the namespace's identity.
    #[must_use]
    pub const fn id(&self) -> NamespaceId {
        self.id
    }

    /// Interns a var owned by this namespace under `sym`.
    ///
    /// If `sym` already maps to a var owned by this namespace, that var is
    /// returned unchanged. Any other binding under `sym` is replaced.
    pub fn intern(self: &Arc<Self>, sym: impl Into<Symbol>) -> Var {
        let sym = sym.into();
        match self.mappings.entry(sym.clone()) {
            Entry::Occupied(mut entry) => {
                if let Binding::Var(existing) = entry.get() {
                    if existing.is_owned_by(self) {
                        return existing.clone();
                    }
                }
                let var = Var::new(self, sym);
                let _ = entry.insert(Binding::Var(var.clone()));
                var
            }
            Entry::Vacant(entry) => {
                let var = Var::new(self, sym);
                let _ = entry.insert(Binding::Var(var.clone()));
                var
            }
        }
    }

    /// Maps `sym` to a var owned by another namespace.
    ///
    /// Returns the binding previously mapped under `sym`, if any.
    pub fn refer(&self, sym: impl Into<Symbol>, var: Var) -> Option<Binding> {
        self.mappings.insert(sym.into(), Binding::Var(var))
    }

    /// Maps `sym` to a host-level name that belongs to no namespace.
    ///
    /// Returns the binding previously mapped under `sym`, if any.
    pub fn import(&self, sym: impl Into<Symbol>, host_name: &str) -> Option<Binding> {
        self.mappings
            .insert(sym.into(), Binding::Local(Arc::from(host_name)))
    }

    /// Returns the binding for `sym`, if mapped.
    #[must_use]
    pub fn mapping(&self, sym: &str) -> Option<Binding> {
        self.mappings.get(sym).map(|entry| entry.value().clone())
    }

    /// Removes and returns the binding for `sym`.
    pub fn unmap(&self, sym: &str) -> Option<Binding> {
        self.mappings.remove(sym).map(|(_, binding)| binding)
    }

    /// Returns a snapshot of all bindings.
    #[must_use]
    pub fn bindings(&self) -> Vec<(Symbol, Binding)> {
        self.mappings
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Returns the owning namespace of every var binding, including vars
    /// owned by this namespace itself.
    #[must_use]
    pub fn var_owners(&self) -> Vec<Arc<Self>> {
        self.mappings
            .iter()
            .filter_map(|entry| entry.value().owner())
            .collect()
    }

    /// Removes every binding, returning how many were dropped.
    ///
    /// Vars hold their owner strongly, so a namespace stays alive while it
    /// maps its own vars or while another namespace refers to them. Clearing
    /// is how a retired namespace releases those references.
    pub fn clear(&self) -> usize {
        let count = self.mappings.len();
        self.mappings.clear();
        tracing::trace!(namespace = %self.name, count, "namespace cleared");
        count
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns `true` if the namespace has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
