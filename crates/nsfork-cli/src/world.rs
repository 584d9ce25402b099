//! JSON world files: a set of namespaces and the references between them.
//!
//! ```json
//! {
//!   "namespaces": [
//!     { "name": "core", "vars": ["map"] },
//!     { "name": "app", "refers": [{ "symbol": "map", "from": "core" }],
//!       "imports": { "String": "java.lang.String" } }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use nsfork_common::config::RuntimeConfig;
use nsfork_common::error::NsForkError;
use nsfork_core::{Binding, Namespace, RegistryView, Var};
use nsfork_runtime::{CurrentNamespace, NamespaceTable, RuntimeContext, Session};
use serde::Deserialize;

/// Top-level world file.
#[derive(Debug, Deserialize)]
pub struct WorldFile {
    /// Declared namespaces.
    pub namespaces: Vec<NamespaceSpec>,
}

/// One namespace declaration.
#[derive(Debug, Deserialize)]
pub struct NamespaceSpec {
    /// Namespace name.
    pub name: String,
    /// Vars interned in this namespace.
    #[serde(default)]
    pub vars: Vec<String>,
    /// Vars referred from other namespaces.
    #[serde(default)]
    pub refers: Vec<ReferSpec>,
    /// Host-level imports, symbol to host name.
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
}

/// A var referred from another namespace.
#[derive(Debug, Deserialize)]
pub struct ReferSpec {
    /// Var name in the owning namespace.
    pub symbol: String,
    /// Owning namespace.
    pub from: String,
}

/// A loaded world: a runtime with every namespace registered at the root.
#[derive(Debug)]
pub struct World {
    runtime: Arc<RuntimeContext>,
    table: Arc<NamespaceTable>,
}

impl World {
    /// Reads and loads a world file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it
    /// declares inconsistent namespaces.
    pub fn load(path: &Path, config: RuntimeConfig) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NsForkError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: WorldFile = serde_json::from_str(&content)
            .with_context(|| format!("parsing world file {}", path.display()))?;
        Self::build(&file, config)
    }

    /// Registers the namespaces of `file` in a new runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if a namespace is declared twice or a refer names an
    /// undeclared namespace.
    pub fn build(file: &WorldFile, config: RuntimeConfig) -> anyhow::Result<Self> {
        let table = Arc::new(NamespaceTable::new());
        let runtime = RuntimeContext::with_config(
            config,
            Arc::clone(&table) as Arc<dyn CurrentNamespace>,
        );

        for spec in &file.namespaces {
            let ns = Namespace::new(spec.name.as_str());
            let registered = runtime.register(Arc::clone(&ns));
            if !Arc::ptr_eq(&registered, &ns) {
                return Err(NsForkError::Config {
                    message: format!("namespace {} declared twice", spec.name),
                }
                .into());
            }
            for var in &spec.vars {
                let _ = ns.intern(var.as_str());
            }
            for (sym, host) in &spec.imports {
                let _ = ns.import(sym.as_str(), host);
            }
        }

        let specs: HashMap<&str, &NamespaceSpec> = file
            .namespaces
            .iter()
            .map(|spec| (spec.name.as_str(), spec))
            .collect();
        for spec in &file.namespaces {
            let Some(ns) = runtime.root().get(&spec.name) else {
                continue;
            };
            for refer in &spec.refers {
                let mut chain = vec![spec.name.as_str()];
                let var = resolve_var(
                    runtime.root(),
                    &specs,
                    &refer.from,
                    &refer.symbol,
                    &mut chain,
                )?;
                let _ = ns.refer(refer.symbol.as_str(), var);
            }
        }

        tracing::info!(namespaces = runtime.root().len(), "world loaded");
        Ok(Self {
            runtime: Arc::new(runtime),
            table,
        })
    }

    /// Returns the loaded runtime.
    pub const fn runtime(&self) -> &Arc<RuntimeContext> {
        &self.runtime
    }

    /// Looks up a namespace in the root registry.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not declared.
    pub fn namespace(&self, name: &str) -> anyhow::Result<Arc<Namespace>> {
        self.runtime.root().get(name).ok_or_else(|| {
            NsForkError::NotFound {
                kind: "namespace",
                id: name.to_string(),
            }
            .into()
        })
    }

    /// Opens a session whose current namespace is `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not declared.
    pub fn session_in(&self, name: &str) -> anyhow::Result<Session> {
        let ns = self.namespace(name)?;
        let session = Session::new(Arc::clone(&self.runtime));
        let _ = self.table.bind(session.id(), ns);
        Ok(session)
    }
}

/// Finds the var `symbol` names in namespace `from`.
///
/// A var already mapped there is reused, so refers of referred vars keep
/// pointing at the namespace that owns them. If `from` declares a refer for
/// `symbol` that has not been applied yet, it is resolved first. Otherwise
/// `from` interns a var of its own.
fn resolve_var<'a>(
    root: &RegistryView,
    specs: &HashMap<&'a str, &'a NamespaceSpec>,
    from: &'a str,
    symbol: &str,
    chain: &mut Vec<&'a str>,
) -> anyhow::Result<Var> {
    let owner = root.get(from).ok_or_else(|| NsForkError::NotFound {
        kind: "namespace",
        id: from.to_string(),
    })?;
    if let Some(Binding::Var(var)) = owner.mapping(symbol) {
        return Ok(var);
    }

    let declared = specs
        .get(from)
        .copied()
        .and_then(|spec| spec.refers.iter().find(|refer| refer.symbol == symbol));
    let Some(refer) = declared else {
        return Ok(owner.intern(symbol));
    };
    if chain.contains(&from) {
        chain.push(from);
        return Err(NsForkError::Config {
            message: format!("refer cycle for {symbol}: {}", chain.join(" -> ")),
        }
        .into());
    }
    chain.push(from);
    let var = resolve_var(root, specs, &refer.from, symbol, chain)?;
    let _ = chain.pop();
    let _ = owner.refer(symbol, var.clone());
    Ok(var)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use nsfork_common::types::Symbol;
    use nsfork_core::depends;

    use super::*;

    const SAMPLE: &str = r#"{
        "namespaces": [
            { "name": "core", "vars": ["map", "reduce"] },
            { "name": "lib", "refers": [{ "symbol": "map", "from": "core" }] },
            { "name": "app",
              "refers": [{ "symbol": "helper", "from": "lib" }],
              "imports": { "String": "java.lang.String" } }
        ]
    }"#;

    fn write_world(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn loads_namespaces_and_references() {
        let file = write_world(SAMPLE);
        let world = World::load(file.path(), RuntimeConfig::default()).expect("should load");
        assert_eq!(world.runtime().root().len(), 3);

        let app = world.namespace("app").expect("app");
        assert_eq!(app.len(), 2);
        let lib = world.namespace("lib").expect("lib");
        assert!(lib.mapping("helper").is_some());
    }

    #[test]
    fn duplicate_namespace_rejected() {
        let file = write_world(r#"{"namespaces": [{"name": "a"}, {"name": "a"}]}"#);
        let err = World::load(file.path(), RuntimeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("declared twice"), "got: {err}");
    }

    #[test]
    fn refer_to_unknown_namespace_rejected() {
        let file = write_world(
            r#"{"namespaces": [{"name": "a", "refers": [{"symbol": "x", "from": "ghost"}]}]}"#,
        );
        let err = World::load(file.path(), RuntimeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("ghost"), "got: {err}");
    }

    #[test]
    fn re_exported_var_keeps_original_owner() {
        let file = write_world(
            r#"{"namespaces": [
                {"name": "app", "refers": [{"symbol": "map", "from": "lib"}]},
                {"name": "lib", "refers": [{"symbol": "map", "from": "core"}]},
                {"name": "core", "vars": ["map"]}
            ]}"#,
        );
        let world = World::load(file.path(), RuntimeConfig::default()).expect("should load");
        let core = world.namespace("core").expect("core");
        let lib = world.namespace("lib").expect("lib");
        let app = world.namespace("app").expect("app");

        for ns in [&lib, &app] {
            let binding = ns.mapping("map").expect("map mapped");
            assert!(binding.as_var().expect("var").is_owned_by(&core));
        }
        assert_eq!(
            depends(&lib, false).names(),
            vec![Symbol::new("core"), Symbol::new("lib")]
        );
        assert_eq!(
            depends(&app, true).names(),
            vec![Symbol::new("app"), Symbol::new("core"), Symbol::new("lib")]
        );
    }

    #[test]
    fn refer_cycle_rejected() {
        let file = write_world(
            r#"{"namespaces": [
                {"name": "a", "refers": [{"symbol": "x", "from": "b"}]},
                {"name": "b", "refers": [{"symbol": "x", "from": "a"}]}
            ]}"#,
        );
        let err = World::load(file.path(), RuntimeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("refer cycle"), "got: {err}");
    }

    #[test]
    fn malformed_file_rejected() {
        let file = write_world("{ not json");
        assert!(World::load(file.path(), RuntimeConfig::default()).is_err());
    }

    #[test]
    fn session_enters_from_declared_namespace() {
        let file = write_world(SAMPLE);
        let world = World::load(
            file.path(),
            RuntimeConfig::default().with_bootstrap("core"),
        )
        .expect("should load");
        let session = world.session_in("app").expect("session");
        let handle = session.enter().expect("enter");
        assert_eq!(handle.len(), 3);
    }
}
