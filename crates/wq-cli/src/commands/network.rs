//! Traversal query commands.

use anyhow::Result;
use clap::Args;

use wq_core::{SelectionMode, WqConfig, WqError};
use wq_graph::{root_subgraph, verse_neighborhood};

use crate::output;

#[derive(Args)]
pub struct NeighborsArgs {
    /// Surah number
    pub surah: i64,

    /// Verse number within the surah
    pub verse: i64,

    /// Minimum number of distinct shared roots
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u16).range(1..=10))]
    pub min_roots: u16,

    /// Maximum number of neighbors
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u16).range(1..=200))]
    pub limit: u16,

    /// Print the raw JSON result
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SubgraphArgs {
    /// Root transliteration key (e.g. ktb)
    pub root: String,

    /// Maximum number of verses
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u16).range(1..=100))]
    pub max_nodes: u16,

    /// Minimum number of distinct shared roots per link
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u16).range(1..=10))]
    pub min_roots: u16,

    /// Maximum number of links
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u16).range(1..=500))]
    pub limit: u16,

    /// Verse selection: mushaf (canonical order) or connected
    #[arg(long, default_value = "mushaf")]
    pub sort: SelectionMode,

    /// Print the raw JSON result
    #[arg(long)]
    pub json: bool,
}

pub async fn neighbors(args: NeighborsArgs, config: &WqConfig) -> Result<()> {
    let store = super::connect_store(&config.graph).await?;
    let result = verse_neighborhood(
        store.as_ref(),
        args.surah,
        args.verse,
        args.min_roots as usize,
        args.limit as usize,
    )
    .await?
    .ok_or(WqError::AyahNotFound {
        surah: args.surah,
        verse: args.verse,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_neighborhood(&result);
    }
    Ok(())
}

pub async fn subgraph(args: SubgraphArgs, config: &WqConfig) -> Result<()> {
    let store = super::connect_store(&config.graph).await?;
    let result = root_subgraph(
        store.as_ref(),
        &args.root,
        args.max_nodes as usize,
        args.min_roots as usize,
        args.limit as usize,
        args.sort,
    )
    .await?
    .ok_or_else(|| WqError::RootNotFound(args.root.clone()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_subgraph(&result);
    }
    Ok(())
}
