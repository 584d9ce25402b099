//! `nsf order` — Print the load order of a namespace's dependency closure.

use std::path::PathBuf;

use clap::Args;
use nsfork_common::config::RuntimeConfig;
use nsfork_core::depends;
use nsfork_core::graph::DependencyGraph;

use crate::output::NamespaceReport;
use crate::world::World;

/// Arguments for the `order` command.
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Path to the JSON world file.
    pub world: PathBuf,

    /// Namespace whose closure is ordered.
    pub namespace: String,
}

/// Executes the `order` command.
///
/// Dependencies are listed before the namespaces that refer to them.
///
/// # Errors
///
/// Returns an error if the world cannot be loaded, the namespace is
/// unknown, or the closure contains a cycle.
pub fn execute(args: &OrderArgs, config: &RuntimeConfig, json: bool) -> anyhow::Result<()> {
    let world = World::load(&args.world, config.clone())?;
    let ns = world.namespace(&args.namespace)?;
    let graph = DependencyGraph::from_closure(&depends(&ns, true));
    let order = graph.load_order()?;
    tracing::debug!(namespace = %args.namespace, ?order, "load order resolved");

    NamespaceReport::new(&args.namespace, "load order", &order).print(json)
}
