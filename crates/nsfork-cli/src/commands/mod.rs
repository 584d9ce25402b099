//! CLI command definitions and dispatch.

pub mod deps;
pub mod enter;
pub mod order;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nsfork_common::config::RuntimeConfig;
use nsfork_common::constants::BIN_NAME;

/// nsf — Inspect namespace dependency closures and isolated views.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON runtime configuration file.
    #[arg(long, global = true, env = "NSF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the bootstrap namespace seeded into every isolated view.
    #[arg(long, global = true, env = "NSF_BOOTSTRAP")]
    pub bootstrap: Option<String>,

    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Resolves the runtime configuration from the global flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn runtime_config(&self) -> anyhow::Result<RuntimeConfig> {
        let config = match &self.config {
            Some(path) => RuntimeConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RuntimeConfig::default(),
        };
        Ok(match &self.bootstrap {
            Some(name) => config.with_bootstrap(name.clone()),
            None => config,
        })
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the namespaces a namespace depends on.
    Deps(deps::DepsArgs),
    /// Print the load order of a namespace's dependency closure.
    Order(order::OrderArgs),
    /// Print the isolated view entering from a namespace would build.
    Enter(enter::EnterArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.runtime_config()?;
    match cli.command {
        Command::Deps(args) => deps::execute(&args, &config, cli.json),
        Command::Order(args) => order::execute(&args, &config, cli.json),
        Command::Enter(args) => enter::execute(&args, &config, cli.json),
    }
}
