//! Surah rows.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;
use serde::Serialize;

/// Surah row from database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurahRow {
    pub id: i64,
    pub number: i64,
    pub name_arabic: String,
    pub revelation_order: i64,
    /// `meccan` or `medinan`.
    pub period: String,
    pub ayah_count: i64,
}

/// Insert a surah.
pub fn insert_surah(pool: &DbPool, surah: &SurahRow) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO surah (id, number, name_arabic, revelation_order, type, ayas_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                surah.id,
                surah.number,
                surah.name_arabic,
                surah.revelation_order,
                surah.period,
                surah.ayah_count
            ],
        )?;
        Ok(())
    })
}

/// List all surahs in recitation order.
pub fn list_surahs(pool: &DbPool) -> DbResult<Vec<SurahRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, number, name_arabic, revelation_order, type, ayas_count
             FROM surah ORDER BY number",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(SurahRow {
                id: row.get(0)?,
                number: row.get(1)?,
                name_arabic: row.get(2)?,
                revelation_order: row.get(3)?,
                period: row.get(4)?,
                ayah_count: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
