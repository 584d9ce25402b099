//! Access to the caller's current namespace.
//!
//! Which namespace an execution context is evaluating in belongs to the
//! host runtime. This module only defines how the isolation layer reads it.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use nsfork_common::types::ExecutionId;
use nsfork_core::Namespace;

/// Source of the namespace an execution context is currently in.
pub trait CurrentNamespace: Send + Sync {
    /// Returns the current namespace of `execution`, if it has one.
    fn current_namespace(&self, execution: &ExecutionId) -> Option<Arc<Namespace>>;
}

impl<F> CurrentNamespace for F
where
    F: Fn(&ExecutionId) -> Option<Arc<Namespace>> + Send + Sync,
{
    fn current_namespace(&self, execution: &ExecutionId) -> Option<Arc<Namespace>> {
        self(execution)
    }
}

/// A table of per-execution current namespaces with a shared default.
///
/// Executions without an explicit binding see the default, mirroring a
/// dynamic variable with a root value and thread-local overrides.
#[derive(Debug, Default)]
pub struct NamespaceTable {
    default: RwLock<Option<Arc<Namespace>>>,
    bound: DashMap<ExecutionId, Arc<Namespace>>,
}

impl NamespaceTable {
    /// Creates a table with no default and no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table whose default is `ns`.
    #[must_use]
    pub fn with_default(ns: Arc<Namespace>) -> Self {
        Self {
            default: RwLock::new(Some(ns)),
            bound: DashMap::new(),
        }
    }

    /// Replaces the default namespace.
    pub fn set_default(&self, ns: Option<Arc<Namespace>>) {
        *self.default.write().unwrap_or_else(PoisonError::into_inner) = ns;
    }

    /// Binds `execution` to `ns`, returning the previous binding.
    pub fn bind(&self, execution: &ExecutionId, ns: Arc<Namespace>) -> Option<Arc<Namespace>> {
        self.bound.insert(execution.clone(), ns)
    }

    /// Removes the binding for `execution`, returning it.
    pub fn unbind(&self, execution: &ExecutionId) -> Option<Arc<Namespace>> {
        self.bound.remove(execution).map(|(_, ns)| ns)
    }
}

impl CurrentNamespace for NamespaceTable {
    fn current_namespace(&self, execution: &ExecutionId) -> Option<Arc<Namespace>> {
        if let Some(ns) = self.bound.get(execution) {
            return Some(Arc::clone(ns.value()));
        }
        self.default
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_overrides_default() {
        let user = Namespace::new("user");
        let app = Namespace::new("app");
        let table = NamespaceTable::with_default(Arc::clone(&user));
        let id = ExecutionId::generate();

        let current = table.current_namespace(&id).expect("default");
        assert!(Arc::ptr_eq(&current, &user));

        let _ = table.bind(&id, Arc::clone(&app));
        let current = table.current_namespace(&id).expect("bound");
        assert!(Arc::ptr_eq(&current, &app));

        let _ = table.unbind(&id);
        let current = table.current_namespace(&id).expect("default again");
        assert!(Arc::ptr_eq(&current, &user));
    }

    #[test]
    fn empty_table_has_no_namespace() {
        let table = NamespaceTable::new();
        assert!(table.current_namespace(&ExecutionId::generate()).is_none());
        table.set_default(Some(Namespace::new("user")));
        assert!(table.current_namespace(&ExecutionId::generate()).is_some());
    }

    #[test]
    fn closures_act_as_sources() {
        let app = Namespace::new("app");
        let source = move |_: &ExecutionId| Some(Arc::clone(&app));
        let current = source.current_namespace(&ExecutionId::generate()).expect("closure");
        assert_eq!(current.name().as_str(), "app");
    }
}
