//! In-memory copy of the relational snapshot.
//!
//! The job loads every record set once into flat vectors keyed by source id
//! and derives the whole graph from them.

use anyhow::{Context, Result};
use wq_db::queries::ayahs::{self, AyahRow};
use wq_db::queries::counts::{self, TableCounts};
use wq_db::queries::roots::{self, RootRow};
use wq_db::queries::surahs::{self, SurahRow};
use wq_db::queries::words::{self, OccurrenceRow};
use wq_db::DbPool;

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub surahs: Vec<SurahRow>,
    pub roots: Vec<RootRow>,
    pub ayahs: Vec<AyahRow>,
    /// Occurrences joined to word and root, in (ayah, position) order.
    pub occurrences: Vec<OccurrenceRow>,
    pub table_counts: TableCounts,
}

impl Snapshot {
    /// Read every record set the graph is derived from.
    pub fn load(db: &DbPool) -> Result<Self> {
        let surahs = surahs::list_surahs(db).context("Failed to read surahs")?;
        let roots = roots::list_roots(db).context("Failed to read roots")?;
        let ayahs = ayahs::list_ayahs(db).context("Failed to read ayahs")?;
        let occurrences = words::list_occurrences(db).context("Failed to read word occurrences")?;
        let table_counts = counts::table_counts(db).context("Failed to count snapshot rows")?;

        tracing::info!(
            surahs = surahs.len(),
            roots = roots.len(),
            ayahs = ayahs.len(),
            occurrences = occurrences.len(),
            "Loaded relational snapshot"
        );

        Ok(Self {
            surahs,
            roots,
            ayahs,
            occurrences,
            table_counts,
        })
    }
}
