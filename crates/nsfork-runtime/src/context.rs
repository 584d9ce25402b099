//! The runtime context: root registry plus per-execution view state.
//!
//! Every execution context is either at the root registry or inside an
//! isolated view. Entering a view pushes the displaced one onto the
//! execution's history unless it was the root; exiting restores the most
//! recently displaced view, falling back to the root once the history is
//! empty.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use nsfork_common::config::RuntimeConfig;
use nsfork_common::constants::{ROOT_VIEW_LABEL, UNBOUND_NAMESPACE};
use nsfork_common::error::{NsForkError, Result};
use nsfork_common::types::{ExecutionId, Symbol, ViewId};
use nsfork_core::{Namespace, NamespaceSet, RegistryView, depends};

use crate::current::CurrentNamespace;
use crate::handle::ContextHandle;
use crate::stack::ContextStack;

/// View state of one execution context.
#[derive(Debug)]
struct ExecutionState {
    current: Arc<RegistryView>,
    history: ContextStack,
}

impl ExecutionState {
    const fn at(view: Arc<RegistryView>) -> Self {
        Self {
            current: view,
            history: ContextStack::new(),
        }
    }
}

/// Owner of the root registry and of every execution context's view state.
///
/// Execution contexts are identified explicitly by [`ExecutionId`]. An
/// execution that has never entered a view, or has been released, is at
/// the root registry.
pub struct RuntimeContext {
    root: Arc<RegistryView>,
    executions: DashMap<ExecutionId, ExecutionState>,
    current_ns: Arc<dyn CurrentNamespace>,
    config: RuntimeConfig,
}

impl RuntimeContext {
    /// Creates a runtime with the default configuration.
    #[must_use]
    pub fn new(current_ns: Arc<dyn CurrentNamespace>) -> Self {
        Self::with_config(RuntimeConfig::default(), current_ns)
    }

    /// Creates a runtime with an explicit configuration.
    #[must_use]
    pub fn with_config(config: RuntimeConfig, current_ns: Arc<dyn CurrentNamespace>) -> Self {
        let root = Arc::new(RegistryView::with_id(ViewId::new(ROOT_VIEW_LABEL)));
        tracing::debug!(bootstrap = %config.bootstrap_namespace, "runtime context created");
        Self {
            root,
            executions: DashMap::new(),
            current_ns,
            config,
        }
    }

    /// Returns the root registry.
    #[must_use]
    pub const fn root(&self) -> &Arc<RegistryView> {
        &self.root
    }

    /// Returns the runtime configuration.
    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Registers `ns` in the root registry under its own name.
    ///
    /// Returns the namespace that ends up registered.
    pub fn register(&self, ns: Arc<Namespace>) -> Arc<Namespace> {
        self.root.put_if_absent(ns.name().clone(), ns)
    }

    /// Returns the view currently in effect for `execution`.
    #[must_use]
    pub fn current_view(&self, execution: &ExecutionId) -> Arc<RegistryView> {
        self.executions.get(execution).map_or_else(
            || Arc::clone(&self.root),
            |state| Arc::clone(&state.current),
        )
    }

    /// Returns `true` if `execution` is at the root registry.
    #[must_use]
    pub fn is_at_root(&self, execution: &ExecutionId) -> bool {
        Arc::ptr_eq(&self.current_view(execution), &self.root)
    }

    /// Returns how many displaced views `execution` can still exit to
    /// before reaching the root.
    #[must_use]
    pub fn depth(&self, execution: &ExecutionId) -> usize {
        self.executions
            .get(execution)
            .map_or(0, |state| state.history.depth())
    }

    /// Returns every namespace in the current view of `execution`.
    #[must_use]
    pub fn values(&self, execution: &ExecutionId) -> Vec<Arc<Namespace>> {
        self.current_view(execution).values()
    }

    /// Looks up `name` in the current view of `execution`.
    #[must_use]
    pub fn get(&self, execution: &ExecutionId, name: &str) -> Option<Arc<Namespace>> {
        self.current_view(execution).get(name)
    }

    /// Inserts `ns` into the current view of `execution` unless `name` is
    /// taken, returning the namespace that ends up registered.
    pub fn put_if_absent(
        &self,
        execution: &ExecutionId,
        name: impl Into<Symbol>,
        ns: Arc<Namespace>,
    ) -> Arc<Namespace> {
        self.current_view(execution).put_if_absent(name, ns)
    }

    /// Removes `name` from the current view of `execution`.
    pub fn remove(&self, execution: &ExecutionId, name: &str) -> Option<Arc<Namespace>> {
        self.current_view(execution).remove(name)
    }

    /// Builds an isolated view for `execution` and enters it.
    ///
    /// The view holds the bootstrap namespace and the transitive
    /// dependencies of the current namespace, each copied by reference from
    /// the root registry. Names the root does not map are left out.
    ///
    /// # Errors
    ///
    /// Returns [`NsForkError::TargetMissingCurrentNamespace`] if the current
    /// namespace is not registered in the root registry.
    pub fn enter(&self, execution: &ExecutionId) -> Result<ContextHandle> {
        let view = RegistryView::new();
        let bootstrap = Symbol::new(&self.config.bootstrap_namespace);
        let _ = view.seed_from(&self.root, [&bootstrap]);

        if let Some(ns) = self.current_ns.current_namespace(execution) {
            let closure: NamespaceSet = depends(&ns, true);
            let copied = view.seed_from(&self.root, closure.names().iter());
            tracing::trace!(
                execution = %execution,
                view = %view.id(),
                closure = closure.len(),
                copied,
                "isolated view seeded"
            );
        }

        self.enter_with(execution, &ContextHandle::new(view))
    }

    /// Makes the view behind `handle` current for `execution`.
    ///
    /// The displaced view is pushed onto the execution's history unless it
    /// is the root registry. Returns a handle to the entered view.
    ///
    /// # Errors
    ///
    /// Returns [`NsForkError::TargetMissingCurrentNamespace`] if the view
    /// does not map the execution's current namespace, or if the execution
    /// has no current namespace. No state changes in that case.
    pub fn enter_with(&self, execution: &ExecutionId, handle: &ContextHandle) -> Result<ContextHandle> {
        let name = match self.current_ns.current_namespace(execution) {
            Some(ns) if handle.contains(ns.name().as_str()) => ns.name().clone(),
            other => {
                let namespace = other
                    .map_or_else(|| UNBOUND_NAMESPACE.to_string(), |ns| ns.name().to_string());
                tracing::warn!(
                    execution = %execution,
                    view = %handle.view_id(),
                    namespace = %namespace,
                    "enter rejected: current namespace missing in target view"
                );
                return Err(NsForkError::TargetMissingCurrentNamespace {
                    namespace,
                    view: handle.view_id().clone(),
                });
            }
        };

        let mut state = self
            .executions
            .entry(execution.clone())
            .or_insert_with(|| ExecutionState::at(Arc::clone(&self.root)));
        let displaced = std::mem::replace(&mut state.current, handle.view());
        if !Arc::ptr_eq(&displaced, &self.root) {
            state.history.push(displaced);
        }
        tracing::debug!(
            execution = %execution,
            view = %handle.view_id(),
            namespace = %name,
            depth = state.history.depth(),
            "entered view"
        );
        Ok(handle.clone())
    }

    /// Leaves the current view of `execution`.
    ///
    /// Restores the most recently displaced view, or the root registry when
    /// there is none. Exiting at the root does nothing. An execution that
    /// lands back on the root is no longer tracked.
    pub fn exit(&self, execution: &ExecutionId) {
        let at_root = {
            let Some(mut state) = self.executions.get_mut(execution) else {
                tracing::trace!(execution = %execution, "exit at root");
                return;
            };
            match state.history.pop() {
                Some(restored) => {
                    state.current = restored;
                    tracing::debug!(
                        execution = %execution,
                        view = %state.current.id(),
                        depth = state.history.depth(),
                        "exited view"
                    );
                    false
                }
                None => true,
            }
        };
        if at_root {
            let _ = self.executions.remove(execution);
            tracing::debug!(execution = %execution, view = ROOT_VIEW_LABEL, "exited to root");
        }
    }

    /// Returns a handle to the current view of `execution`.
    #[must_use]
    pub fn current_handle(&self, execution: &ExecutionId) -> ContextHandle {
        ContextHandle::from_shared(self.current_view(execution))
    }

    /// Registers a new execution context that starts in `parent`'s current
    /// view.
    ///
    /// The child shares the view object with the parent but has its own,
    /// empty history, so later switches by either side do not affect the
    /// other. A parent without state hands down the root registry.
    pub fn spawn(&self, parent: &ExecutionId) -> ExecutionId {
        let child = ExecutionId::generate();
        let view = self.current_view(parent);
        tracing::debug!(parent = %parent, child = %child, view = %view.id(), "execution spawned");
        let _ = self.executions.insert(child.clone(), ExecutionState::at(view));
        child
    }

    /// Forgets the view state of `execution`, returning it to the root.
    pub fn release(&self, execution: &ExecutionId) {
        if self.executions.remove(execution).is_some() {
            tracing::trace!(execution = %execution, "execution released");
        }
    }

    /// Returns the number of execution contexts with tracked state.
    #[must_use]
    pub fn tracked_executions(&self) -> usize {
        self.executions.len()
    }
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("root", &self.root.id())
            .field("namespaces", &self.root.len())
            .field("executions", &self.executions.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
