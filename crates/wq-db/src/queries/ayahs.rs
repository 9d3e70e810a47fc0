//! Ayah rows, joined to their surah number.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;
use serde::Serialize;

/// Ayah row from database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AyahRow {
    pub id: i64,
    pub surah_id: i64,
    pub surah_number: i64,
    pub number: i64,
    pub text_arabic: String,
}

/// Insert an ayah under an existing surah.
pub fn insert_ayah(pool: &DbPool, id: i64, surah_id: i64, number: i64, text_arabic: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO ayah (id, surah_id, number, text_arabic) VALUES (?1, ?2, ?3, ?4)",
            params![id, surah_id, number, text_arabic],
        )?;
        Ok(())
    })
}

/// List all ayahs ordered by id.
pub fn list_ayahs(pool: &DbPool) -> DbResult<Vec<AyahRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT a.id, a.surah_id, s.number, a.number, a.text_arabic
             FROM ayah a
             JOIN surah s ON s.id = a.surah_id
             ORDER BY a.id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(AyahRow {
                id: row.get(0)?,
                surah_id: row.get(1)?,
                surah_number: row.get(2)?,
                number: row.get(3)?,
                text_arabic: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
