//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use wq_core::WqConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path used with --log
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, config: &WqConfig) -> Result<()> {
    let mut server = config.server.clone();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    let store = super::connect_store(&config.graph).await?;

    println!();
    println!("  {} {}", "WikiQuran".cyan().bold(), "Graph API".bold());
    println!();
    println!(
        "  {}       http://{}:{}/api/network",
        "API".green(),
        server.host,
        server.port
    );
    println!(
        "  {}    http://{}:{}/api/graph/status",
        "Status".green(),
        server.host,
        server.port
    );
    println!("  {}   {}", "Backend".green(), store.backend_name());
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    wq_web::run_server(store, &server).await?;

    Ok(())
}
