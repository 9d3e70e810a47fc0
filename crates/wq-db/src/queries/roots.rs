//! Root rows.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;
use serde::Serialize;

/// Root row from database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootRow {
    pub id: i64,
    /// Transliteration key, unique (e.g. `ktb`).
    pub key: String,
    pub arabic: String,
    pub occurrences_count: i64,
}

/// Insert a root.
pub fn insert_root(pool: &DbPool, id: i64, key: &str, arabic: &str, occurrences_count: i64) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO root (id, translit, arabic, occurrences_count) VALUES (?1, ?2, ?3, ?4)",
            params![id, key, arabic, occurrences_count],
        )?;
        Ok(())
    })
}

/// List all roots ordered by id.
pub fn list_roots(pool: &DbPool) -> DbResult<Vec<RootRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, translit, arabic, occurrences_count FROM root ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RootRow {
                id: row.get(0)?,
                key: row.get(1)?,
                arabic: row.get(2)?,
                occurrences_count: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
