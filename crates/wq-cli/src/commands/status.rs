//! Graph status command.

use anyhow::Result;
use colored::Colorize;

use wq_core::WqConfig;

use crate::output;

pub async fn execute(config: &WqConfig) -> Result<()> {
    let store = super::connect_store(&config.graph).await?;
    let counts = store.counts().await?;
    let last_sync = store.last_sync_time().await?;

    println!("{} ({})", "Graph status".bold(), store.backend_name().cyan());
    println!("{}", "─".repeat(40));
    output::print_counts(&counts);
    println!();
    match last_sync {
        Some(at) => println!("  {} {}", "Last rebuild:".bold(), at),
        None => println!("  {}", "Never rebuilt. Run 'wq sync' first.".yellow()),
    }

    Ok(())
}
