//! `nsf deps` — Print the namespaces a namespace depends on.

use std::path::PathBuf;

use clap::Args;
use nsfork_common::config::RuntimeConfig;
use nsfork_core::depends;

use crate::output::NamespaceReport;
use crate::world::World;

/// Arguments for the `deps` command.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Path to the JSON world file.
    pub world: PathBuf,

    /// Namespace to inspect.
    pub namespace: String,

    /// Follow dependencies transitively.
    #[arg(short, long)]
    pub deep: bool,
}

/// Executes the `deps` command.
///
/// # Errors
///
/// Returns an error if the world cannot be loaded or the namespace is unknown.
pub fn execute(args: &DepsArgs, config: &RuntimeConfig, json: bool) -> anyhow::Result<()> {
    let world = World::load(&args.world, config.clone())?;
    let ns = world.namespace(&args.namespace)?;
    let set = depends(&ns, args.deep);

    let kind = if args.deep {
        "transitive dependencies"
    } else {
        "dependencies"
    };
    NamespaceReport::new(&args.namespace, kind, &set.names()).print(json)
}
