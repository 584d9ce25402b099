//! Output helpers shared by the CLI commands.

use nsfork_common::types::Symbol;
use serde::Serialize;

/// A named list of namespaces, printed as text or JSON.
#[derive(Debug, Serialize)]
pub struct NamespaceReport {
    /// Namespace the report was computed for.
    pub namespace: String,
    /// What the list contains.
    pub kind: &'static str,
    /// Namespace names, in report order.
    pub namespaces: Vec<String>,
}

impl NamespaceReport {
    /// Creates a report from symbols.
    #[must_use]
    pub fn new(namespace: &str, kind: &'static str, names: &[Symbol]) -> Self {
        Self {
            namespace: namespace.to_string(),
            kind,
            namespaces: names.iter().map(ToString::to_string).collect(),
        }
    }

    /// Renders the report as plain text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!("{} of {}:\n", self.kind, self.namespace);
        for name in &self.namespaces {
            out.push_str("  ");
            out.push_str(name);
            out.push('\n');
        }
        out.push_str(&format!("  {} namespace(s)", self.namespaces.len()));
        out
    }

    /// Prints the report to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            println!("{}", self.to_text());
        }
        Ok(())
    }
}
