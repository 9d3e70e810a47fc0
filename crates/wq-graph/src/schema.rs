//! Neo4j schema initialization (constraints and indexes).

use anyhow::Result;
use neo4rs::Query;
use tracing::info;

use crate::GraphClient;

/// Cypher statements for schema initialization.
///
/// Uniqueness constraints must exist before the first upsert so `MERGE`
/// never creates a second node for the same key.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // Uniqueness constraints
    "CREATE CONSTRAINT surah_pg_id IF NOT EXISTS FOR (s:Surah) REQUIRE s.pg_id IS UNIQUE",
    "CREATE CONSTRAINT ayah_pg_id IF NOT EXISTS FOR (a:Ayah) REQUIRE a.pg_id IS UNIQUE",
    "CREATE CONSTRAINT word_pg_id IF NOT EXISTS FOR (w:Word) REQUIRE w.pg_id IS UNIQUE",
    "CREATE CONSTRAINT root_key IF NOT EXISTS FOR (r:Root) REQUIRE r.key IS UNIQUE",
    // Traversal indexes
    "CREATE INDEX idx_surah_number IF NOT EXISTS FOR (s:Surah) ON (s.number)",
    "CREATE INDEX idx_ayah_ref IF NOT EXISTS FOR (a:Ayah) ON (a.surah_number, a.ayah_number)",
    "CREATE INDEX idx_surah_period IF NOT EXISTS FOR (s:Surah) ON (s.period)",
    "CREATE INDEX idx_shares_root_key IF NOT EXISTS FOR ()-[r:SHARES_ROOT]-() ON (r.root_key)",
];

/// Initialize Neo4j schema with constraints and indexes.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(client: &GraphClient) -> Result<()> {
    info!("Initializing Neo4j schema...");

    for statement in SCHEMA_STATEMENTS {
        client.execute(Query::new(statement.to_string())).await?;
    }

    info!("Neo4j schema initialized ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}
