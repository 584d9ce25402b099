//! Unified error types for the nsfork workspace.
//!
//! Registry accessors, dependency resolution, and `exit` are total and never
//! produce these errors. Only switching into a view, load-order resolution,
//! and configuration loading are fallible.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ViewId;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum NsForkError {
    /// The target view does not contain the caller's current namespace.
    ///
    /// Raised by `enter` before any state is modified.
    #[error("current namespace {namespace} is missing in target view {view}")]
    TargetMissingCurrentNamespace {
        /// Name of the caller's current namespace.
        namespace: String,
        /// View that was rejected.
        view: ViewId,
    },

    /// The namespaces of a closure reference each other in a cycle.
    #[error("cyclic dependency detected between namespaces: {}", .namespaces.join(", "))]
    CyclicDependency {
        /// Namespaces that take part in the cycle.
        namespaces: Vec<String>,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NsForkError>;
