//! Sessions: one execution context bound to a runtime.
//!
//! A session carries its [`ExecutionId`] explicitly so that the registry
//! accessors and the enter/exit protocol need no implicit thread affinity.
//! Child sessions are created at spawn time and start in the parent's
//! current view.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use nsfork_common::error::Result;
use nsfork_common::types::{ExecutionId, Symbol};
use nsfork_core::{Namespace, RegistryView};

use crate::context::RuntimeContext;
use crate::handle::ContextHandle;

/// An execution context's view of a [`RuntimeContext`].
///
/// Dropping the session releases its view state.
#[derive(Debug)]
pub struct Session {
    runtime: Arc<RuntimeContext>,
    id: ExecutionId,
}

impl Session {
    /// Starts a session at the root registry.
    #[must_use]
    pub fn new(runtime: Arc<RuntimeContext>) -> Self {
        Self::with_id(runtime, ExecutionId::generate())
    }

    /// Starts a session for a known execution identifier.
    #[must_use]
    pub const fn with_id(runtime: Arc<RuntimeContext>, id: ExecutionId) -> Self {
        Self { runtime, id }
    }

    /// Returns the session's execution identifier.
    #[must_use]
    pub const fn id(&self) -> &ExecutionId {
        &self.id
    }

    /// Returns the runtime this session belongs to.
    #[must_use]
    pub const fn runtime(&self) -> &Arc<RuntimeContext> {
        &self.runtime
    }

    /// Returns the view currently in effect.
    #[must_use]
    pub fn current_view(&self) -> Arc<RegistryView> {
        self.runtime.current_view(&self.id)
    }

    /// Returns `true` if the session is at the root registry.
    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.runtime.is_at_root(&self.id)
    }

    /// Returns the number of displaced views above the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.runtime.depth(&self.id)
    }

    /// Returns every namespace in the current view.
    #[must_use]
    pub fn values(&self) -> Vec<Arc<Namespace>> {
        self.runtime.values(&self.id)
    }

    /// Looks up `name` in the current view.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Namespace>> {
        self.runtime.get(&self.id, name)
    }

    /// Inserts `ns` into the current view unless `name` is taken.
    pub fn put_if_absent(&self, name: impl Into<Symbol>, ns: Arc<Namespace>) -> Arc<Namespace> {
        self.runtime.put_if_absent(&self.id, name, ns)
    }

    /// Removes `name` from the current view.
    pub fn remove(&self, name: &str) -> Option<Arc<Namespace>> {
        self.runtime.remove(&self.id, name)
    }

    /// Builds an isolated view for the current namespace and enters it.
    ///
    /// # Errors
    ///
    /// Returns an error if the current namespace is not in the root registry.
    pub fn enter(&self) -> Result<ContextHandle> {
        self.runtime.enter(&self.id)
    }

    /// Enters the view behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the view lacks the current namespace.
    pub fn enter_with(&self, handle: &ContextHandle) -> Result<ContextHandle> {
        self.runtime.enter_with(&self.id, handle)
    }

    /// Leaves the current view.
    pub fn exit(&self) {
        self.runtime.exit(&self.id);
    }

    /// Enters a fresh isolated view until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the current namespace is not in the root registry.
    pub fn isolate(&self) -> Result<IsolationGuard<'_>> {
        let handle = self.enter()?;
        Ok(IsolationGuard {
            session: self,
            handle,
        })
    }

    /// Enters the view behind `handle` until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the view lacks the current namespace.
    pub fn isolate_with(&self, handle: &ContextHandle) -> Result<IsolationGuard<'_>> {
        let handle = self.enter_with(handle)?;
        Ok(IsolationGuard {
            session: self,
            handle,
        })
    }

    /// Creates a child session starting in this session's current view.
    #[must_use]
    pub fn spawn(&self) -> Self {
        let child = self.runtime.spawn(&self.id);
        Self::with_id(Arc::clone(&self.runtime), child)
    }

    /// Runs `f` on a new thread with a child session.
    ///
    /// The child's view is captured before the thread starts, so switches
    /// made by this session afterwards are not observed by the child.
    pub fn spawn_thread<F, T>(&self, f: F) -> JoinHandle<T>
    where
        F: FnOnce(Self) -> T + Send + 'static,
        T: Send + 'static,
    {
        let child = self.spawn();
        thread::spawn(move || f(child))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.runtime.release(&self.id);
    }
}

/// Keeps a session inside a view; exits it when dropped.
#[derive(Debug)]
pub struct IsolationGuard<'a> {
    session: &'a Session,
    handle: ContextHandle,
}

impl IsolationGuard<'_> {
    /// Returns the handle of the entered view.
    #[must_use]
    pub const fn handle(&self) -> &ContextHandle {
        &self.handle
    }
}

impl Drop for IsolationGuard<'_> {
    fn drop(&mut self) {
        self.session.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::current::{CurrentNamespace, NamespaceTable};
    use nsfork_common::config::RuntimeConfig;

    fn runtime() -> (Arc<RuntimeContext>, Arc<NamespaceTable>) {
        let table = Arc::new(NamespaceTable::new());
        let runtime = RuntimeContext::with_config(
            RuntimeConfig::default().with_bootstrap("core"),
            Arc::clone(&table) as Arc<dyn CurrentNamespace>,
        );
        let core = runtime.register(Namespace::new("core"));
        let app = runtime.register(Namespace::new("app"));
        let _ = app.refer("map", core.intern("map"));
        table.set_default(Some(app));
        (Arc::new(runtime), table)
    }

    #[test]
    fn guard_exits_on_drop() {
        let (runtime, _table) = runtime();
        let session = Session::new(runtime);
        {
            let guard = session.isolate().expect("isolate");
            assert!(guard.handle().contains("app"));
            assert!(!session.is_at_root());
        }
        assert!(session.is_at_root());
    }

    #[test]
    fn isolated_puts_stay_private() {
        let (runtime, _table) = runtime();
        let session = Session::new(Arc::clone(&runtime));
        let guard = session.isolate().expect("isolate");
        let tmp = Namespace::new("tmp");
        let winner = session.put_if_absent("tmp", Arc::clone(&tmp));
        assert!(Arc::ptr_eq(&winner, &tmp));
        assert!(runtime.root().get("tmp").is_none());
        drop(guard);
        assert!(session.get("tmp").is_none());
    }

    #[test]
    fn dropping_session_releases_state() {
        let (runtime, _table) = runtime();
        let session = Session::new(Arc::clone(&runtime));
        let _ = session.enter().expect("enter");
        assert_eq!(runtime.tracked_executions(), 1);
        drop(session);
        assert_eq!(runtime.tracked_executions(), 0);
    }

    #[test]
    fn spawned_thread_sees_parent_view_at_spawn() {
        let (runtime, _table) = runtime();
        let session = Session::new(runtime);
        let handle = session.enter().expect("enter");
        let _ = session.put_if_absent("scratch", Namespace::new("scratch"));

        let worker = session.spawn_thread(|child| {
            let seen = child.get("scratch").is_some();
            let at_root = child.is_at_root();
            (seen, at_root)
        });
        session.exit();

        let (seen, at_root) = worker.join().expect("worker panicked");
        assert!(seen);
        assert!(!at_root);
        assert!(session.is_at_root());
        assert!(!handle.is_empty());
    }
}
