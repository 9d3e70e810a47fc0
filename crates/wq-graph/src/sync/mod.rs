//! Full rebuild of the graph from the relational snapshot.
//!
//! Steps run strictly in order: schema, surahs, roots, ayahs (+`HAS_AYAH`),
//! words (+`CONTAINS`, `DERIVED_FROM`), `SHARES_ROOT`, validation. Every write
//! is an upsert, so a failed run is recovered by running it again.

pub mod shares_root;
pub mod snapshot;
pub mod validate;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use wq_core::config::SyncConfig;
use wq_db::DbPool;

use crate::model::{AyahNode, RootNode, SurahNode, WordOccurrence};
use crate::store::GraphStore;
use shares_root::compute_shares_root;
use snapshot::Snapshot;
use validate::{expected_counts, ValidationReport};

/// Batches between progress log lines.
const PROGRESS_EVERY: usize = 10;

/// Tuning for a rebuild.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Rows per upsert round-trip.
    pub batch_size: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { batch_size: 500 }
    }
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            batch_size: config.batch_size,
        }
    }
}

/// Rows written per step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepCounts {
    pub surahs: usize,
    pub roots: usize,
    pub ayahs: usize,
    pub occurrences: usize,
    pub shares_root: usize,
}

/// Outcome of a full rebuild.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub backend: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub written: StepCounts,
    pub validation: ValidationReport,
}

impl SyncReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

fn log_progress(step: &str, batch: usize, total_batches: usize, rows: usize) {
    if batch % PROGRESS_EVERY == 0 || batch == total_batches {
        info!(step, batch, total_batches, rows, "Upsert progress");
    }
}

/// Rebuild the whole graph from `db` into `store`.
pub async fn run_full_sync(store: &dyn GraphStore, db: &DbPool, options: &SyncOptions) -> Result<SyncReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let batch_size = options.batch_size.max(1);
    info!(%run_id, backend = store.backend_name(), batch_size, "Starting full graph rebuild");

    store
        .initialize_schema()
        .await
        .context("Failed to initialize graph schema")?;

    let snapshot = Snapshot::load(db).context("Failed to load relational snapshot")?;
    let mut written = StepCounts::default();

    // Surahs
    let surahs: Vec<SurahNode> = snapshot.surahs.iter().map(SurahNode::from).collect();
    store
        .upsert_surahs(&surahs)
        .await
        .context("Failed to upsert surahs")?;
    written.surahs = surahs.len();
    info!(rows = written.surahs, "Surahs synced");

    // Roots
    let roots: Vec<RootNode> = snapshot.roots.iter().map(RootNode::from).collect();
    store
        .upsert_roots(&roots)
        .await
        .context("Failed to upsert roots")?;
    written.roots = roots.len();
    info!(rows = written.roots, "Roots synced");

    // Ayahs + HAS_AYAH
    let ayahs: Vec<AyahNode> = snapshot.ayahs.iter().map(AyahNode::from).collect();
    let total_batches = ayahs.len().div_ceil(batch_size);
    for (i, chunk) in ayahs.chunks(batch_size).enumerate() {
        store
            .upsert_ayahs(chunk)
            .await
            .with_context(|| format!("Failed to upsert ayah batch {}", i + 1))?;
        written.ayahs += chunk.len();
        log_progress("ayahs", i + 1, total_batches, written.ayahs);
    }
    info!(rows = written.ayahs, "Ayahs synced");

    // Words + CONTAINS + DERIVED_FROM
    let occurrences: Vec<WordOccurrence> = snapshot.occurrences.iter().map(WordOccurrence::from).collect();
    let total_batches = occurrences.len().div_ceil(batch_size);
    for (i, chunk) in occurrences.chunks(batch_size).enumerate() {
        store
            .upsert_words(chunk)
            .await
            .with_context(|| format!("Failed to upsert word batch {}", i + 1))?;
        written.occurrences += chunk.len();
        log_progress("words", i + 1, total_batches, written.occurrences);
    }
    info!(rows = written.occurrences, "Words synced");

    // SHARES_ROOT
    let edges = compute_shares_root(&snapshot.occurrences, &snapshot.roots);
    info!(edges = edges.len(), "Computed shares-root relation");
    let total_batches = edges.len().div_ceil(batch_size);
    for (i, chunk) in edges.chunks(batch_size).enumerate() {
        store
            .upsert_shares_root(chunk)
            .await
            .with_context(|| format!("Failed to upsert SHARES_ROOT batch {}", i + 1))?;
        written.shares_root += chunk.len();
        log_progress("shares_root", i + 1, total_batches, written.shares_root);
    }
    info!(rows = written.shares_root, "SHARES_ROOT synced");

    // Validation
    let expected = expected_counts(&snapshot, edges.len());
    let actual = store.counts().await.context("Failed to count graph")?;
    let validation = ValidationReport::compare(&expected, &actual);
    for check in validation.mismatches() {
        warn!(
            check = check.name,
            expected = check.expected,
            actual = check.actual,
            "Graph count does not match snapshot"
        );
    }

    let finished_at = Utc::now();
    store
        .save_last_sync_time(&finished_at.to_rfc3339())
        .await
        .context("Failed to record sync time")?;

    info!(
        %run_id,
        nodes = actual.nodes(),
        relationships = actual.relationships(),
        consistent = validation.is_consistent(),
        "Graph rebuild complete"
    );

    Ok(SyncReport {
        run_id,
        backend: store.backend_name(),
        started_at,
        finished_at,
        written,
        validation,
    })
}
