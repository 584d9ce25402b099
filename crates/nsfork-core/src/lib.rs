//! # nsfork-core
//!
//! The structural pieces of namespace isolation:
//! - **Namespace**: named containers of bindings, shared by reference between views.
//! - **Registry**: concurrent name-to-namespace maps (the root registry and private views).
//! - **Depends**: shallow and transitive dependency sets of a namespace.
//! - **Graph**: `petgraph`-backed load ordering of a dependency closure.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod depends;
pub mod graph;
pub mod namespace;
pub mod registry;

pub use depends::{NamespaceSet, depends};
pub use namespace::{Binding, Namespace, NamespaceId, Var};
pub use registry::RegistryView;
