//! Row counts used by post-rebuild validation.

use crate::pool::DbPool;
use crate::pool::DbResult;
use serde::Serialize;

/// Number of rows per snapshot table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub surahs: usize,
    pub ayahs: usize,
    pub roots: usize,
    pub words: usize,
    pub occurrences: usize,
}

/// Count rows in every snapshot table.
pub fn table_counts(pool: &DbPool) -> DbResult<TableCounts> {
    pool.with_conn(|conn| {
        let count = |table: &str| -> rusqlite::Result<usize> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
            Ok(n as usize)
        };

        Ok(TableCounts {
            surahs: count("surah")?,
            ayahs: count("ayah")?,
            roots: count("root")?,
            words: count("word")?,
            occurrences: count("word_occurrence")?,
        })
    })
}
