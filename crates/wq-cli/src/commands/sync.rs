//! Graph rebuild command.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use wq_core::{WqConfig, WqError};
use wq_graph::{run_full_sync, SyncOptions};

use crate::output;

#[derive(Args)]
pub struct SyncArgs {
    /// Relational snapshot to read (overrides source.path)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Rows per upsert round-trip (overrides sync.batch_size)
    #[arg(long)]
    pub batch_size: Option<usize>,
}

pub async fn execute(args: SyncArgs, config: &WqConfig) -> Result<()> {
    let source = args.source.unwrap_or_else(|| config.source.path.clone());
    if !source.exists() {
        bail!("Relational snapshot not found at {}", source.display());
    }

    let mut options = SyncOptions::from(&config.sync);
    if let Some(n) = args.batch_size {
        if n == 0 {
            return Err(WqError::validation("--batch-size must be at least 1").into());
        }
        options.batch_size = n;
    }

    let db = wq_db::open_snapshot(&source)
        .with_context(|| format!("Failed to open snapshot {}", source.display()))?;
    let store = super::connect_store(&config.graph).await?;

    println!(
        "{} {} {}",
        "Rebuilding graph".bold(),
        "→".dimmed(),
        store.backend_name().cyan()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")?,
    );
    pb.set_message("Syncing...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = run_full_sync(store.as_ref(), &db, &options).await;
    pb.finish_and_clear();
    let report = result?;

    println!("\n{}", "Sync complete:".green().bold());
    println!("  Surahs:        {}", report.written.surahs);
    println!("  Roots:         {}", report.written.roots);
    println!("  Ayahs:         {}", report.written.ayahs);
    println!("  Occurrences:   {}", report.written.occurrences);
    println!("  SHARES_ROOT:   {}", report.written.shares_root);
    println!("  {}", format!("run {} in {} ms", report.run_id, report.elapsed_ms()).dimmed());
    println!();

    output::print_validation(&report.validation);

    Ok(())
}
