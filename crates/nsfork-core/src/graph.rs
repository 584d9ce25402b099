//! Load ordering of a dependency closure using `petgraph`.
//!
//! Builds a directed graph from the var references between the members of
//! a namespace set and resolves a topological order in which every
//! namespace appears after the namespaces it depends on.

use std::collections::HashMap;

use nsfork_common::error::{NsForkError, Result};
use nsfork_common::types::Symbol;
use petgraph::graph::NodeIndex;

use crate::depends::NamespaceSet;
use crate::namespace::NamespaceId;

/// A dependency graph over a fixed set of namespaces.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Internal petgraph representation.
    graph: petgraph::Graph<Symbol, ()>,
}

impl DependencyGraph {
    /// Builds the graph for `set`.
    ///
    /// Edges are only drawn between members; references leaving the set and
    /// a namespace's references to its own vars are ignored.
    #[must_use]
    pub fn from_closure(set: &NamespaceSet) -> Self {
        let mut graph = petgraph::Graph::new();
        let mut nodes: HashMap<NamespaceId, NodeIndex> = HashMap::new();
        for ns in set.iter() {
            let idx = graph.add_node(ns.name().clone());
            let _ = nodes.insert(ns.id(), idx);
        }

        for ns in set.iter() {
            let dependent = nodes[&ns.id()];
            for owner in ns.var_owners() {
                if owner.id() == ns.id() {
                    continue;
                }
                if let Some(&dependency) = nodes.get(&owner.id()) {
                    // Dependency points at dependent so the sort yields dependencies first.
                    let _ = graph.update_edge(dependency, dependent, ());
                }
            }
        }

        Self { graph }
    }

    /// Returns the number of namespaces in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the namespace names with dependencies before dependents.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespaces reference each other in a cycle.
    pub fn load_order(&self) -> Result<Vec<Symbol>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(_cycle) => Err(NsForkError::CyclicDependency {
                namespaces: self.cycle_members(),
            }),
        }
    }

    fn cycle_members(&self) -> Vec<String> {
        let mut members: Vec<String> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .flatten()
            .filter_map(|idx| self.graph.node_weight(idx).map(ToString::to_string))
            .collect();
        members.sort();
        members
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::depends::depends;
    use crate::namespace::Namespace;

    fn refer(from: &Arc<Namespace>, to: &Arc<Namespace>, sym: &str) {
        let _ = from.refer(sym, to.intern(sym));
    }

    #[test]
    fn single_namespace_orders_itself() {
        let core = Namespace::new("core");
        let _ = core.intern("map");
        let graph = DependencyGraph::from_closure(&depends(&core, true));
        assert_eq!(graph.load_order().expect("acyclic"), vec![Symbol::new("core")]);
    }

    #[test]
    fn dependencies_load_first() {
        let base = Namespace::new("base");
        let core = Namespace::new("core");
        let app = Namespace::new("app");
        refer(&core, &base, "id");
        refer(&app, &core, "map");
        refer(&app, &base, "id");

        let graph = DependencyGraph::from_closure(&depends(&app, true));
        assert_eq!(graph.node_count(), 3);
        let order = graph.load_order().expect("acyclic");
        let pos = |name: &str| order.iter().position(|n| n.as_str() == name).expect(name);
        assert!(pos("base") < pos("core"));
        assert!(pos("core") < pos("app"));
    }

    #[test]
    fn cycle_is_reported_with_members() {
        let a = Namespace::new("a");
        let b = Namespace::new("b");
        let c = Namespace::new("c");
        refer(&a, &b, "x");
        refer(&b, &a, "y");
        refer(&a, &c, "z");

        let graph = DependencyGraph::from_closure(&depends(&a, true));
        let err = graph.load_order().unwrap_err();
        assert!(
            matches!(&err, NsForkError::CyclicDependency { namespaces } if namespaces == &["a", "b"]),
            "got: {err}"
        );
    }
}
