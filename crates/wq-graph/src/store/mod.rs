//! Graph storage seam.
//!
//! The synthesis job and the traversal engine only talk to a [`GraphStore`].
//! It exposes one write pattern (schema + batched idempotent upserts) and the
//! handful of fixed read patterns the two traversal queries need. All
//! aggregation, deduplication and ranking happens above this trait, so both
//! backends answer queries identically.
//!
//! Row-ordering contract for `SHARES_ROOT` reads: ascending by
//! (`ayah1.pg_id`, `ayah2.pg_id`, `root_pg_id`), so "first seen" root order is
//! stable across runs and backends.

mod neo4j;
mod sqlite;

pub use neo4j::Neo4jStore;
pub use sqlite::SqliteGraphStore;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use wq_core::config::{GraphBackend, GraphConfig};

use crate::model::{
    AyahNode, AyahRef, GraphCounts, RootNode, RootSummary, SharesRootEdge, SharesRootRow,
    SurahNode, WordOccurrence,
};

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Short backend name for logs and status output.
    fn backend_name(&self) -> &'static str;

    /// Create uniqueness constraints and secondary indexes. Idempotent.
    async fn initialize_schema(&self) -> Result<()>;

    /// Upsert surah nodes keyed by `pg_id`.
    async fn upsert_surahs(&self, batch: &[SurahNode]) -> Result<()>;

    /// Upsert root nodes keyed by transliteration key.
    async fn upsert_roots(&self, batch: &[RootNode]) -> Result<()>;

    /// Upsert ayah nodes keyed by `pg_id` and merge `HAS_AYAH` from the parent surah.
    async fn upsert_ayahs(&self, batch: &[AyahNode]) -> Result<()>;

    /// Upsert word nodes and merge `CONTAINS` (and `DERIVED_FROM` when rooted).
    async fn upsert_words(&self, batch: &[WordOccurrence]) -> Result<()>;

    /// Upsert `SHARES_ROOT` edges keyed by (verse pair, root key).
    async fn upsert_shares_root(&self, batch: &[SharesRootEdge]) -> Result<()>;

    /// Record when the last full rebuild finished (RFC 3339).
    async fn save_last_sync_time(&self, at: &str) -> Result<()>;

    /// When the last full rebuild finished, if ever.
    async fn last_sync_time(&self) -> Result<Option<String>>;

    /// Node counts per label and relationship counts per type.
    async fn counts(&self) -> Result<GraphCounts>;

    /// Look up a verse by reference.
    async fn find_ayah(&self, surah: i64, verse: i64) -> Result<Option<AyahRef>>;

    /// All `SHARES_ROOT` edges touching a verse, in either direction.
    async fn shares_root_incident(&self, surah: i64, verse: i64) -> Result<Vec<SharesRootRow>>;

    /// Look up a root by key, with the number of distinct verses containing it.
    async fn find_root(&self, key: &str) -> Result<Option<RootSummary>>;

    /// Distinct verses containing a word derived from the root, in (surah, verse)
    /// order, optionally capped.
    async fn ayahs_with_root(&self, key: &str, limit: Option<usize>) -> Result<Vec<AyahRef>>;

    /// `SHARES_ROOT` edges whose both endpoints are among `pg_ids`.
    async fn shares_root_within(&self, pg_ids: &[i64]) -> Result<Vec<SharesRootRow>>;
}

/// Open the graph store selected by configuration.
pub async fn open_store(config: &GraphConfig) -> Result<Arc<dyn GraphStore>> {
    match config.backend {
        GraphBackend::Neo4j => {
            let store = Neo4jStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        GraphBackend::Sqlite => {
            let store = SqliteGraphStore::open(&config.sqlite_path)?;
            Ok(Arc::new(store))
        }
    }
}
