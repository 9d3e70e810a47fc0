//! WikiQuran Database Layer
//!
//! Read access to the relational source of truth (SQLite). The graph
//! synthesis job pulls bulk snapshots from here; nothing in the graph
//! layer ever writes back.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool, DbResult};

use std::path::Path;

/// Tables the graph synthesis job reads.
pub const SNAPSHOT_TABLES: [&str; 5] = ["surah", "ayah", "root", "word", "word_occurrence"];

/// Open an existing relational snapshot read-only. The schema is checked,
/// never migrated: a file missing any snapshot table is rejected.
pub fn open_snapshot(path: &Path) -> DbResult<DbPool> {
    let pool = DbPool::open_read_only(path)?;
    pool.with_conn(|conn| {
        for table in SNAPSHOT_TABLES {
            let present: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get(0),
            )?;
            if !present {
                return Err(DbError::NotFound(format!(
                    "table '{}' in snapshot {}",
                    table,
                    path.display()
                )));
            }
        }
        Ok(())
    })?;
    tracing::debug!(path = %path.display(), "Relational snapshot opened read-only");
    Ok(pool)
}

/// In-memory database with the schema applied. Used to seed snapshots in tests.
pub fn init_memory_pool() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::path::PathBuf;

    fn temp_db(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("wq-db-{}-{}.db", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn header_state(path: &Path) -> (i64, String) {
        let conn = Connection::open(path).unwrap();
        let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0)).unwrap();
        let mode: String = conn.query_row("PRAGMA journal_mode", [], |r| r.get(0)).unwrap();
        (version, mode)
    }

    #[test]
    fn test_open_snapshot_leaves_file_untouched() {
        let path = temp_db("snapshot-untouched");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(migrations::SCHEMA).unwrap();
            conn.execute("INSERT INTO root (id, translit, arabic, occurrences_count) VALUES (1, 'ktb', 'كتب', 3)", [])
                .unwrap();
        }
        let before = header_state(&path);
        assert_eq!(before, (0, "delete".to_string()));

        {
            let pool = open_snapshot(&path).unwrap();
            let counts = queries::counts::table_counts(&pool).unwrap();
            assert_eq!(counts.roots, 1);

            let write = pool.with_conn(|conn| {
                conn.execute("DELETE FROM root", [])?;
                Ok(())
            });
            assert!(write.is_err());
        }

        assert_eq!(header_state(&path), before);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_snapshot_rejects_missing_tables() {
        let path = temp_db("snapshot-partial");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE surah (id INTEGER PRIMARY KEY);").unwrap();
        }

        let err = open_snapshot(&path).err().unwrap();
        assert!(matches!(err, DbError::NotFound(ref m) if m.contains("ayah")));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_snapshot_does_not_create_file() {
        let path = temp_db("snapshot-absent");
        assert!(open_snapshot(&path).is_err());
        assert!(!path.exists());
    }
}
