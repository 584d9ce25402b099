//! Per-execution namespace isolation for the nsfork runtime.
//!
//! A [`RuntimeContext`](context::RuntimeContext) owns the root registry and
//! tracks, for every execution context, which registry view is current and
//! which views it displaced. [`Session`](session::Session) binds one
//! execution context to a runtime and is the usual entry point.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod context;
pub mod current;
pub mod handle;
pub mod session;
pub mod stack;

pub use context::RuntimeContext;
pub use current::{CurrentNamespace, NamespaceTable};
pub use handle::ContextHandle;
pub use session::{IsolationGuard, Session};
pub use stack::ContextStack;
