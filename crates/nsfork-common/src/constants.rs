//! System-wide constants and well-known names.

/// Name of the bootstrap namespace copied into every isolated view.
pub const DEFAULT_BOOTSTRAP_NS: &str = "clojure.core";

/// Label used when logging or printing the root registry.
pub const ROOT_VIEW_LABEL: &str = "root";

/// Placeholder reported when an execution has no current namespace.
pub const UNBOUND_NAMESPACE: &str = "<unbound>";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "nsf";
