//! `nsf enter` — Print the isolated view entering from a namespace would build.

use std::path::PathBuf;

use clap::Args;
use nsfork_common::config::RuntimeConfig;

use crate::output::NamespaceReport;
use crate::world::World;

/// Arguments for the `enter` command.
#[derive(Args, Debug)]
pub struct EnterArgs {
    /// Path to the JSON world file.
    pub world: PathBuf,

    /// Namespace to treat as the current namespace.
    pub namespace: String,
}

/// Executes the `enter` command.
///
/// Enters an isolated view in a throwaway session and lists its contents.
///
/// # Errors
///
/// Returns an error if the world cannot be loaded, the namespace is
/// unknown, or the view is rejected.
pub fn execute(args: &EnterArgs, config: &RuntimeConfig, json: bool) -> anyhow::Result<()> {
    let world = World::load(&args.world, config.clone())?;
    let session = world.session_in(&args.namespace)?;
    let guard = session.isolate()?;
    let names = guard.handle().names();
    tracing::debug!(
        view = %guard.handle().view_id(),
        root = world.runtime().root().len(),
        "isolated view built"
    );
    drop(guard);

    NamespaceReport::new(&args.namespace, "isolated view", &names).print(json)
}
