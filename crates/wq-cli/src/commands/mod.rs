//! CLI command definitions and handlers.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wq_core::config::GraphConfig;
use wq_core::WqConfig;
use wq_graph::GraphStore;

pub mod network;
pub mod serve;
pub mod status;
pub mod sync;

/// How long to wait for the graph store before giving up.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// WikiQuran - verse network over shared lexical roots
#[derive(Parser)]
#[command(name = "wq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (defaults to ./wq.toml when present)
    #[arg(short, long, global = true, env = "WQ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the graph from the relational snapshot
    Sync(sync::SyncArgs),

    /// Show graph node/relationship counts and last rebuild time
    Status,

    /// Show the verses sharing roots with one verse
    Neighbors(network::NeighborsArgs),

    /// Show the verse subgraph around a root
    Subgraph(network::SubgraphArgs),

    /// Start the HTTP API
    Serve(serve::ServeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = WqConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Sync(args) => sync::execute(args, &config).await,
            Commands::Status => status::execute(&config).await,
            Commands::Neighbors(args) => network::neighbors(args, &config).await,
            Commands::Subgraph(args) => network::subgraph(args, &config).await,
            Commands::Serve(args) => serve::execute(args, &config).await,
        }
    }
}

/// Open the configured graph store, failing fast when it is unreachable.
pub(crate) async fn connect_store(config: &GraphConfig) -> Result<Arc<dyn GraphStore>> {
    tokio::time::timeout(CONNECT_TIMEOUT, wq_graph::open_store(config))
        .await
        .map_err(|_| {
            anyhow!(
                "Timed out connecting to the {} graph store at {}",
                config.backend.as_str(),
                config.uri
            )
        })?
}
