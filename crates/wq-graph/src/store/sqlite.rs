//! Embedded graph backend on SQLite.
//!
//! Nodes and relationships live in one table each; uniqueness keys mirror the
//! Neo4j constraints so upserts behave like `MERGE`. Relationship rows are
//! only written when both endpoints already exist, matching `MATCH ... MERGE`.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use super::GraphStore;
use crate::model::{
    AyahNode, AyahRef, GraphCounts, RootNode, RootSummary, SharesRootEdge, SharesRootRow,
    SurahNode, WordOccurrence,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS graph_surah (
    pg_id INTEGER PRIMARY KEY,
    number INTEGER NOT NULL,
    name_arabic TEXT NOT NULL,
    revelation_order INTEGER NOT NULL,
    period TEXT NOT NULL,
    ayah_count INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS graph_root (
    key TEXT PRIMARY KEY,
    pg_id INTEGER NOT NULL,
    arabic TEXT NOT NULL,
    occurrences_count INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS graph_ayah (
    pg_id INTEGER PRIMARY KEY,
    surah_number INTEGER NOT NULL,
    ayah_number INTEGER NOT NULL,
    text_arabic TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS graph_word (
    pg_id INTEGER PRIMARY KEY,
    text_arabic TEXT NOT NULL,
    pos TEXT,
    lemma TEXT
);

CREATE TABLE IF NOT EXISTS rel_has_ayah (
    surah_pg_id INTEGER NOT NULL,
    ayah_pg_id INTEGER NOT NULL,
    PRIMARY KEY (surah_pg_id, ayah_pg_id)
);

CREATE TABLE IF NOT EXISTS rel_contains (
    ayah_pg_id INTEGER NOT NULL,
    word_pg_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (ayah_pg_id, word_pg_id, position)
);

CREATE TABLE IF NOT EXISTS rel_derived_from (
    word_pg_id INTEGER NOT NULL,
    root_key TEXT NOT NULL,
    PRIMARY KEY (word_pg_id, root_key)
);

CREATE TABLE IF NOT EXISTS rel_shares_root (
    ayah1_pg_id INTEGER NOT NULL,
    ayah2_pg_id INTEGER NOT NULL,
    root_key TEXT NOT NULL,
    root_pg_id INTEGER NOT NULL,
    root_arabic TEXT NOT NULL,
    count INTEGER NOT NULL,
    PRIMARY KEY (ayah1_pg_id, ayah2_pg_id, root_key)
);

CREATE TABLE IF NOT EXISTS sync_state (
    id TEXT PRIMARY KEY,
    last_synced_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_graph_ayah_ref ON graph_ayah(surah_number, ayah_number);
CREATE INDEX IF NOT EXISTS idx_rel_contains_word ON rel_contains(word_pg_id);
CREATE INDEX IF NOT EXISTS idx_rel_derived_from_root ON rel_derived_from(root_key);
CREATE INDEX IF NOT EXISTS idx_rel_shares_root_dst ON rel_shares_root(ayah2_pg_id);
CREATE INDEX IF NOT EXISTS idx_rel_shares_root_key ON rel_shares_root(root_key);
"#;

const SHARES_ROOT_SELECT: &str = "SELECT a1.pg_id, a1.surah_number, a1.ayah_number,
        a2.pg_id, a2.surah_number, a2.ayah_number,
        s.root_pg_id, s.root_key, s.root_arabic, s.count
 FROM rel_shares_root s
 JOIN graph_ayah a1 ON a1.pg_id = s.ayah1_pg_id
 JOIN graph_ayah a2 ON a2.pg_id = s.ayah2_pg_id";

/// Graph store backed by a single SQLite connection.
pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
}

impl SqliteGraphStore {
    /// Open (or create) a graph database file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create graph directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open graph database {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch(SCHEMA)?;

        tracing::debug!(path = %path.display(), "Opened SQLite graph store");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Private in-memory graph, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow!("graph store lock poisoned: {}", e))?;
        f(&conn).context("SQLite graph operation failed")
    }
}

fn ayah_ref_at(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<AyahRef> {
    Ok(AyahRef {
        pg_id: row.get(offset)?,
        surah_number: row.get(offset + 1)?,
        verse_number: row.get(offset + 2)?,
    })
}

fn shares_root_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SharesRootRow> {
    Ok(SharesRootRow {
        ayah1: ayah_ref_at(row, 0)?,
        ayah2: ayah_ref_at(row, 3)?,
        root_pg_id: row.get(6)?,
        root_key: row.get(7)?,
        root_arabic: row.get(8)?,
        count: row.get(9)?,
    })
}

fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<usize> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
    Ok(n as usize)
}

#[async_trait]
impl GraphStore for SqliteGraphStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.with_conn(|conn| conn.execute_batch(SCHEMA))
    }

    async fn upsert_surahs(&self, batch: &[SurahNode]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for s in batch {
                tx.execute(
                    "INSERT INTO graph_surah (pg_id, number, name_arabic, revelation_order, period, ayah_count)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(pg_id) DO UPDATE SET
                        number = excluded.number,
                        name_arabic = excluded.name_arabic,
                        revelation_order = excluded.revelation_order,
                        period = excluded.period,
                        ayah_count = excluded.ayah_count",
                    params![s.pg_id, s.number, s.name_arabic, s.revelation_order, s.period, s.ayah_count],
                )?;
            }
            tx.commit()
        })
    }

    async fn upsert_roots(&self, batch: &[RootNode]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for r in batch {
                tx.execute(
                    "INSERT INTO graph_root (key, pg_id, arabic, occurrences_count)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(key) DO UPDATE SET
                        pg_id = excluded.pg_id,
                        arabic = excluded.arabic,
                        occurrences_count = excluded.occurrences_count",
                    params![r.key, r.pg_id, r.arabic, r.occurrences_count],
                )?;
            }
            tx.commit()
        })
    }

    async fn upsert_ayahs(&self, batch: &[AyahNode]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for a in batch {
                tx.execute(
                    "INSERT INTO graph_ayah (pg_id, surah_number, ayah_number, text_arabic)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(pg_id) DO UPDATE SET
                        surah_number = excluded.surah_number,
                        ayah_number = excluded.ayah_number,
                        text_arabic = excluded.text_arabic",
                    params![a.pg_id, a.surah_number, a.verse_number, a.text_arabic],
                )?;
                tx.execute(
                    "INSERT OR IGNORE INTO rel_has_ayah (surah_pg_id, ayah_pg_id)
                     SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM graph_surah WHERE pg_id = ?1)",
                    params![a.surah_pg_id, a.pg_id],
                )?;
            }
            tx.commit()
        })
    }

    async fn upsert_words(&self, batch: &[WordOccurrence]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for w in batch {
                tx.execute(
                    "INSERT INTO graph_word (pg_id, text_arabic, pos, lemma)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(pg_id) DO UPDATE SET
                        text_arabic = excluded.text_arabic,
                        pos = excluded.pos,
                        lemma = excluded.lemma",
                    params![w.word_pg_id, w.text_arabic, w.pos, w.lemma],
                )?;
                tx.execute(
                    "INSERT OR IGNORE INTO rel_contains (ayah_pg_id, word_pg_id, position)
                     SELECT ?1, ?2, ?3 WHERE EXISTS (SELECT 1 FROM graph_ayah WHERE pg_id = ?1)",
                    params![w.ayah_pg_id, w.word_pg_id, w.position],
                )?;
                if let Some(root_key) = &w.root_key {
                    tx.execute(
                        "INSERT OR IGNORE INTO rel_derived_from (word_pg_id, root_key)
                         SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM graph_root WHERE key = ?2)",
                        params![w.word_pg_id, root_key],
                    )?;
                }
            }
            tx.commit()
        })
    }

    async fn upsert_shares_root(&self, batch: &[SharesRootEdge]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for e in batch {
                tx.execute(
                    "INSERT INTO rel_shares_root (ayah1_pg_id, ayah2_pg_id, root_key, root_pg_id, root_arabic, count)
                     SELECT ?1, ?2, ?3, ?4, ?5, ?6
                     WHERE EXISTS (SELECT 1 FROM graph_ayah WHERE pg_id = ?1)
                       AND EXISTS (SELECT 1 FROM graph_ayah WHERE pg_id = ?2)
                     ON CONFLICT(ayah1_pg_id, ayah2_pg_id, root_key) DO UPDATE SET
                        root_pg_id = excluded.root_pg_id,
                        root_arabic = excluded.root_arabic,
                        count = excluded.count",
                    params![e.ayah1_pg_id, e.ayah2_pg_id, e.root_key, e.root_pg_id, e.root_arabic, e.count],
                )?;
            }
            tx.commit()
        })
    }

    async fn save_last_sync_time(&self, at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sync_state (id, last_synced_at) VALUES ('graph', ?1)
                 ON CONFLICT(id) DO UPDATE SET last_synced_at = excluded.last_synced_at",
                params![at],
            )?;
            Ok(())
        })
    }

    async fn last_sync_time(&self) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT last_synced_at FROM sync_state WHERE id = 'graph'")?;
            let mut rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.next().transpose()
        })
    }

    async fn counts(&self) -> Result<GraphCounts> {
        self.with_conn(|conn| {
            Ok(GraphCounts {
                surahs: count_rows(conn, "graph_surah")?,
                ayahs: count_rows(conn, "graph_ayah")?,
                words: count_rows(conn, "graph_word")?,
                roots: count_rows(conn, "graph_root")?,
                has_ayah: count_rows(conn, "rel_has_ayah")?,
                contains: count_rows(conn, "rel_contains")?,
                derived_from: count_rows(conn, "rel_derived_from")?,
                shares_root: count_rows(conn, "rel_shares_root")?,
            })
        })
    }

    async fn find_ayah(&self, surah: i64, verse: i64) -> Result<Option<AyahRef>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT pg_id, surah_number, ayah_number FROM graph_ayah
                 WHERE surah_number = ?1 AND ayah_number = ?2
                 ORDER BY pg_id LIMIT 1",
            )?;
            let mut rows = stmt.query_map(params![surah, verse], |row| ayah_ref_at(row, 0))?;
            rows.next().transpose()
        })
    }

    async fn shares_root_incident(&self, surah: i64, verse: i64) -> Result<Vec<SharesRootRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{} WHERE (a1.surah_number = ?1 AND a1.ayah_number = ?2)
                     OR (a2.surah_number = ?1 AND a2.ayah_number = ?2)
                 ORDER BY a1.pg_id, a2.pg_id, s.root_pg_id",
                SHARES_ROOT_SELECT
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![surah, verse], shares_root_row)?;
            rows.collect()
        })
    }

    async fn find_root(&self, key: &str) -> Result<Option<RootSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT r.pg_id, r.key, r.arabic, r.occurrences_count,
                        (SELECT COUNT(DISTINCT c.ayah_pg_id)
                         FROM rel_derived_from d
                         JOIN rel_contains c ON c.word_pg_id = d.word_pg_id
                         WHERE d.root_key = r.key)
                 FROM graph_root r WHERE r.key = ?1",
            )?;
            let mut rows = stmt.query_map(params![key], |row| {
                Ok(RootSummary {
                    pg_id: row.get(0)?,
                    key: row.get(1)?,
                    arabic: row.get(2)?,
                    occurrences_count: row.get(3)?,
                    total_ayahs: row.get::<_, i64>(4)? as usize,
                })
            })?;
            rows.next().transpose()
        })
    }

    async fn ayahs_with_root(&self, key: &str, limit: Option<usize>) -> Result<Vec<AyahRef>> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT a.pg_id, a.surah_number, a.ayah_number
                 FROM rel_derived_from d
                 JOIN rel_contains c ON c.word_pg_id = d.word_pg_id
                 JOIN graph_ayah a ON a.pg_id = c.ayah_pg_id
                 WHERE d.root_key = ?1
                 ORDER BY a.surah_number, a.ayah_number, a.pg_id
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![key, limit], |row| ayah_ref_at(row, 0))?;
            rows.collect()
        })
    }

    async fn shares_root_within(&self, pg_ids: &[i64]) -> Result<Vec<SharesRootRow>> {
        if pg_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = serde_json::to_string(pg_ids)?;
        self.with_conn(|conn| {
            let sql = format!(
                "{} WHERE s.ayah1_pg_id IN (SELECT value FROM json_each(?1))
                   AND s.ayah2_pg_id IN (SELECT value FROM json_each(?1))
                 ORDER BY a1.pg_id, a2.pg_id, s.root_pg_id",
                SHARES_ROOT_SELECT
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![ids], shares_root_row)?;
            rows.collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surah(pg_id: i64, number: i64) -> SurahNode {
        SurahNode {
            pg_id,
            number,
            name_arabic: format!("سورة {}", number),
            revelation_order: number,
            period: "meccan".to_string(),
            ayah_count: 7,
        }
    }

    fn ayah(pg_id: i64, surah_pg_id: i64, surah_number: i64, verse_number: i64) -> AyahNode {
        AyahNode {
            pg_id,
            surah_pg_id,
            surah_number,
            verse_number,
            text_arabic: String::new(),
        }
    }

    fn root(pg_id: i64, key: &str) -> RootNode {
        RootNode {
            key: key.to_string(),
            pg_id,
            arabic: key.to_uppercase(),
            occurrences_count: 0,
        }
    }

    fn word(word_pg_id: i64, ayah_pg_id: i64, position: i64, root_key: Option<&str>) -> WordOccurrence {
        WordOccurrence {
            word_pg_id,
            ayah_pg_id,
            position,
            text_arabic: format!("w{}", word_pg_id),
            pos: None,
            lemma: None,
            root_key: root_key.map(str::to_string),
        }
    }

    fn edge(a1: i64, a2: i64, root_pg_id: i64, key: &str, count: i64) -> SharesRootEdge {
        SharesRootEdge {
            ayah1_pg_id: a1,
            ayah2_pg_id: a2,
            root_pg_id,
            root_key: key.to_string(),
            root_arabic: key.to_uppercase(),
            count,
        }
    }

    async fn seeded() -> SqliteGraphStore {
        let store = SqliteGraphStore::in_memory().unwrap();
        store.upsert_surahs(&[surah(1, 2), surah(2, 3)]).await.unwrap();
        store.upsert_roots(&[root(1, "ktb"), root(2, "Elm")]).await.unwrap();
        store
            .upsert_ayahs(&[ayah(10, 1, 2, 2), ayah(11, 2, 3, 7), ayah(12, 1, 2, 3)])
            .await
            .unwrap();
        store
            .upsert_words(&[
                word(100, 10, 1, Some("ktb")),
                word(101, 11, 1, Some("ktb")),
                word(102, 11, 2, Some("Elm")),
                word(103, 12, 1, None),
            ])
            .await
            .unwrap();
        store
            .upsert_shares_root(&[edge(10, 11, 1, "ktb", 1)])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_upserts_are_idempotent() {
        let store = seeded().await;
        let first = store.counts().await.unwrap();

        store.upsert_surahs(&[surah(1, 2)]).await.unwrap();
        store.upsert_ayahs(&[ayah(10, 1, 2, 2)]).await.unwrap();
        store.upsert_words(&[word(100, 10, 1, Some("ktb"))]).await.unwrap();
        store.upsert_shares_root(&[edge(10, 11, 1, "ktb", 1)]).await.unwrap();

        assert_eq!(store.counts().await.unwrap(), first);
        assert_eq!(first.surahs, 2);
        assert_eq!(first.ayahs, 3);
        assert_eq!(first.words, 4);
        assert_eq!(first.has_ayah, 3);
        assert_eq!(first.contains, 4);
        assert_eq!(first.derived_from, 3);
        assert_eq!(first.shares_root, 1);
    }

    #[tokio::test]
    async fn test_upsert_updates_properties() {
        let store = seeded().await;
        store.upsert_shares_root(&[edge(10, 11, 1, "ktb", 4)]).await.unwrap();

        let rows = store.shares_root_incident(2, 2).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 4);
    }

    #[tokio::test]
    async fn test_relationships_need_both_endpoints() {
        let store = seeded().await;
        store.upsert_ayahs(&[ayah(20, 99, 50, 1)]).await.unwrap();
        store.upsert_words(&[word(200, 77, 1, Some("nope"))]).await.unwrap();
        store.upsert_shares_root(&[edge(10, 77, 1, "ktb", 1)]).await.unwrap();

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.ayahs, 4);
        assert_eq!(counts.has_ayah, 3);
        assert_eq!(counts.words, 5);
        assert_eq!(counts.contains, 4);
        assert_eq!(counts.derived_from, 3);
        assert_eq!(counts.shares_root, 1);
    }

    #[tokio::test]
    async fn test_find_ayah() {
        let store = seeded().await;
        let found = store.find_ayah(3, 7).await.unwrap().unwrap();
        assert_eq!(found.pg_id, 11);
        assert!(found.is_verse(3, 7));
        assert!(store.find_ayah(3, 8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_incident_edges_in_either_direction() {
        let store = seeded().await;
        let from_source = store.shares_root_incident(2, 2).await.unwrap();
        let from_target = store.shares_root_incident(3, 7).await.unwrap();
        assert_eq!(from_source, from_target);
        assert_eq!(from_source[0].ayah1.pg_id, 10);
        assert_eq!(from_source[0].ayah2.pg_id, 11);
        assert!(store.shares_root_incident(2, 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_root_counts_distinct_ayahs() {
        let store = seeded().await;
        let ktb = store.find_root("ktb").await.unwrap().unwrap();
        assert_eq!(ktb.pg_id, 1);
        assert_eq!(ktb.total_ayahs, 2);
        assert!(store.find_root("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ayahs_with_root_canonical_order_and_limit() {
        let store = seeded().await;
        let all = store.ayahs_with_root("ktb", None).await.unwrap();
        let refs: Vec<(i64, i64)> = all.iter().map(|a| a.canonical_key()).collect();
        assert_eq!(refs, vec![(2, 2), (3, 7)]);

        let capped = store.ayahs_with_root("ktb", Some(1)).await.unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].pg_id, 10);
    }

    #[tokio::test]
    async fn test_shares_root_within() {
        let store = seeded().await;
        assert_eq!(store.shares_root_within(&[10, 11]).await.unwrap().len(), 1);
        assert!(store.shares_root_within(&[10, 12]).await.unwrap().is_empty());
        assert!(store.shares_root_within(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_last_sync_time_round_trip() {
        let store = SqliteGraphStore::in_memory().unwrap();
        assert!(store.last_sync_time().await.unwrap().is_none());
        store.save_last_sync_time("2026-01-01T00:00:00Z").await.unwrap();
        store.save_last_sync_time("2026-01-02T00:00:00Z").await.unwrap();
        assert_eq!(
            store.last_sync_time().await.unwrap().as_deref(),
            Some("2026-01-02T00:00:00Z")
        );
    }
}
