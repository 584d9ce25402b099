//! Bindings stored inside a namespace.

use std::fmt;
use std::sync::Arc;

use nsfork_common::types::Symbol;

use super::Namespace;

/// A value slot owned by a namespace.
///
/// A var keeps its owning namespace alive for as long as it is mapped
/// anywhere, even after the owner has been removed from every registry.
#[derive(Clone)]
pub struct Var {
    ns: Arc<Namespace>,
    sym: Symbol,
}

impl Var {
    pub(super) fn new(owner: &Arc<Namespace>, sym: Symbol) -> Self {
        Self {
            ns: Arc::clone(owner),
            sym,
        }
    }

    /// Returns the var's name within its owning namespace.
    #[must_use]
    pub const fn sym(&self) -> &Symbol {
        &self.sym
    }

    /// Returns the owning namespace.
    #[must_use]
    pub const fn ns(&self) -> &Arc<Namespace> {
        &self.ns
    }

    /// Returns `true` if `ns` is the namespace that owns this var.
    #[must_use]
    pub fn is_owned_by(&self, ns: &Arc<Namespace>) -> bool {
        Arc::ptr_eq(&self.ns, ns)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{}/{}", self.ns.name(), self.sym)
    }
}

/// What a symbol maps to inside a namespace.
#[derive(Debug, Clone)]
pub enum Binding {
    /// A var, owned by this namespace or referred from another one.
    Var(Var),
    /// A host-level name (such as an imported class) with no owning namespace.
    Local(Arc<str>),
}

impl Binding {
    /// Returns the var if this binding is one.
    #[must_use]
    pub const fn as_var(&self) -> Option<&Var> {
        match self {
            Self::Var(var) => Some(var),
            Self::Local(_) => None,
        }
    }

    /// Returns the namespace owning this binding, if it is a var.
    #[must_use]
    pub fn owner(&self) -> Option<Arc<Namespace>> {
        self.as_var().map(|var| Arc::clone(var.ns()))
    }
}
