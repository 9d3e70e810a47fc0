//! Word and word-occurrence rows.
//!
//! The synthesis job reads occurrences joined to their word and (optional)
//! root in a single pass, so word nodes, `CONTAINS` and `DERIVED_FROM` can
//! be produced from one scan.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;
use serde::Serialize;

/// One occurrence of a word inside an ayah, with the word's attributes inlined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccurrenceRow {
    pub word_id: i64,
    pub ayah_id: i64,
    pub position: i64,
    pub text_arabic: String,
    pub pos: Option<String>,
    pub lemma: Option<String>,
    pub root_id: Option<i64>,
    pub root_key: Option<String>,
}

/// Insert a word. `root_id` is `None` for words without a recognized root.
pub fn insert_word(
    pool: &DbPool,
    id: i64,
    text_arabic: &str,
    root_id: Option<i64>,
    lemma: Option<&str>,
    pos: Option<&str>,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO word (id, text_arabic, root_id, lemma_translit, pos) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, text_arabic, root_id, lemma, pos],
        )?;
        Ok(())
    })
}

/// Insert one occurrence of a word at a 1-based position inside an ayah.
pub fn insert_occurrence(pool: &DbPool, word_id: i64, ayah_id: i64, position: i64) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO word_occurrence (word_id, ayah_id, position) VALUES (?1, ?2, ?3)",
            params![word_id, ayah_id, position],
        )?;
        Ok(())
    })
}

/// List every occurrence joined to its word and root, in reading order.
pub fn list_occurrences(pool: &DbPool) -> DbResult<Vec<OccurrenceRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT wo.word_id, wo.ayah_id, wo.position,
                    w.text_arabic, w.pos, w.lemma_translit,
                    r.id, r.translit
             FROM word_occurrence wo
             JOIN word w ON w.id = wo.word_id
             LEFT JOIN root r ON r.id = w.root_id
             ORDER BY wo.ayah_id, wo.position",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(OccurrenceRow {
                word_id: row.get(0)?,
                ayah_id: row.get(1)?,
                position: row.get(2)?,
                text_arabic: row.get(3)?,
                pos: row.get(4)?,
                lemma: row.get(5)?,
                root_id: row.get(6)?,
                root_key: row.get(7)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}
