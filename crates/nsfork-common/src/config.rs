//! Configuration model for the nsfork runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NsForkError, Result};

/// Root configuration for a runtime context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Namespace copied into every isolated view regardless of dependencies.
    pub bootstrap_namespace: String,
}

impl RuntimeConfig {
    /// Returns a copy of this configuration with a different bootstrap namespace.
    #[must_use]
    pub fn with_bootstrap(mut self, name: impl Into<String>) -> Self {
        self.bootstrap_namespace = name.into();
        self
    }

    /// Loads configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or names an empty bootstrap namespace.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NsForkError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        if config.bootstrap_namespace.trim().is_empty() {
            return Err(NsForkError::Config {
                message: "bootstrap_namespace must not be empty".into(),
            });
        }
        Ok(config)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bootstrap_namespace: crate::constants::DEFAULT_BOOTSTRAP_NS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_bootstrap_is_clojure_core() {
        assert_eq!(RuntimeConfig::default().bootstrap_namespace, "clojure.core");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"bootstrap_namespace": "core"}}"#).expect("write");
        let config = RuntimeConfig::from_json_file(file.path()).expect("should load");
        assert_eq!(config.bootstrap_namespace, "core");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{}}").expect("write");
        let config = RuntimeConfig::from_json_file(file.path()).expect("should load");
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn empty_bootstrap_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"bootstrap_namespace": "  "}}"#).expect("write");
        let err = RuntimeConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, NsForkError::Config { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RuntimeConfig::from_json_file(Path::new("/nonexistent/nsfork.json"))
            .unwrap_err();
        assert!(matches!(err, NsForkError::Io { .. }));
    }
}
