//! Neo4j graph backend.
//!
//! Writes go through `UNWIND $batch` so one round-trip upserts a whole batch.
//! Relationship `MERGE`s sit behind `MATCH`es, so an edge whose endpoint is
//! missing is silently skipped.

use anyhow::Result;
use async_trait::async_trait;
use neo4rs::{BoltMap, BoltNull, BoltString, BoltType, Query, Row};
use wq_core::config::GraphConfig;

use super::GraphStore;
use crate::client::{field_of, GraphClient};
use crate::model::{
    AyahNode, AyahRef, GraphCounts, NodeLabel, RelType, RootNode, RootSummary, SharesRootEdge,
    SharesRootRow, SurahNode, WordOccurrence,
};
use crate::schema;

const UPSERT_SURAHS: &str = "
UNWIND $batch AS row
MERGE (s:Surah {pg_id: row.pg_id})
SET s.number = row.number,
    s.name_arabic = row.name_arabic,
    s.revelation_order = row.revelation_order,
    s.period = row.period,
    s.ayah_count = row.ayah_count";

const UPSERT_ROOTS: &str = "
UNWIND $batch AS row
MERGE (r:Root {key: row.key})
SET r.pg_id = row.pg_id,
    r.arabic = row.arabic,
    r.occurrences_count = row.occurrences_count";

const UPSERT_AYAHS: &str = "
UNWIND $batch AS row
MERGE (a:Ayah {pg_id: row.pg_id})
SET a.surah_number = row.surah_number,
    a.ayah_number = row.ayah_number,
    a.text_arabic = row.text_arabic
WITH a, row
MATCH (s:Surah {pg_id: row.surah_pg_id})
MERGE (s)-[:HAS_AYAH]->(a)";

const UPSERT_WORDS: &str = "
UNWIND $batch AS row
MERGE (w:Word {pg_id: row.word_pg_id})
SET w.text_arabic = row.text_arabic,
    w.pos = row.pos,
    w.lemma = row.lemma
WITH w, row
OPTIONAL MATCH (a:Ayah {pg_id: row.ayah_pg_id})
FOREACH (_ IN CASE WHEN a IS NULL THEN [] ELSE [1] END |
    MERGE (a)-[:CONTAINS {position: row.position}]->(w))
WITH w, row
WHERE row.root_key IS NOT NULL
MATCH (r:Root {key: row.root_key})
MERGE (w)-[:DERIVED_FROM]->(r)";

const UPSERT_SHARES_ROOT: &str = "
UNWIND $batch AS row
MATCH (a1:Ayah {pg_id: row.ayah1_pg_id})
MATCH (a2:Ayah {pg_id: row.ayah2_pg_id})
MERGE (a1)-[s:SHARES_ROOT {root_key: row.root_key}]->(a2)
SET s.root_arabic = row.root_arabic,
    s.root_pg_id = row.root_pg_id,
    s.count = row.count";

const SHARES_ROOT_RETURN: &str = "
RETURN a1.pg_id AS a1_id, a1.surah_number AS a1_surah, a1.ayah_number AS a1_verse,
       a2.pg_id AS a2_id, a2.surah_number AS a2_surah, a2.ayah_number AS a2_verse,
       s.root_pg_id AS root_pg_id, s.root_key AS root_key,
       s.root_arabic AS root_arabic, s.count AS count
ORDER BY a1_id, a2_id, root_pg_id";

/// Graph store on a Neo4j server.
pub struct Neo4jStore {
    client: GraphClient,
}

impl Neo4jStore {
    /// Connect using the graph configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let client = GraphClient::connect(config).await?;
        Ok(Self { client })
    }

    async fn upsert_batch(&self, cypher: &str, batch: Vec<BoltType>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let query = Query::new(cypher.to_string()).param("batch", batch);
        self.client.execute(query).await
    }

    async fn count(&self, cypher: String) -> Result<usize> {
        let n: Option<i64> = self.client.query_scalar(Query::new(cypher), "c").await?;
        Ok(n.unwrap_or(0) as usize)
    }
}

/// Builder for one `UNWIND` row.
struct BoltRow(BoltMap);

impl BoltRow {
    fn new() -> Self {
        Self(BoltMap::new())
    }

    fn with(mut self, key: &str, value: impl Into<BoltType>) -> Self {
        self.0.put(BoltString::from(key), value.into());
        self
    }

    fn with_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with(key, v.to_string()),
            None => self.with(key, BoltType::Null(BoltNull)),
        }
    }

    fn build(self) -> BoltType {
        BoltType::Map(self.0)
    }
}

fn ayah_ref(row: &Row, prefix: &str) -> Result<AyahRef> {
    Ok(AyahRef {
        pg_id: field_of(row, &format!("{}_id", prefix))?,
        surah_number: field_of(row, &format!("{}_surah", prefix))?,
        verse_number: field_of(row, &format!("{}_verse", prefix))?,
    })
}

fn shares_root_row(row: &Row) -> Result<SharesRootRow> {
    Ok(SharesRootRow {
        ayah1: ayah_ref(row, "a1")?,
        ayah2: ayah_ref(row, "a2")?,
        root_pg_id: field_of(row, "root_pg_id")?,
        root_key: field_of(row, "root_key")?,
        root_arabic: field_of(row, "root_arabic")?,
        count: field_of(row, "count")?,
    })
}

#[async_trait]
impl GraphStore for Neo4jStore {
    fn backend_name(&self) -> &'static str {
        "neo4j"
    }

    async fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(&self.client).await
    }

    async fn upsert_surahs(&self, batch: &[SurahNode]) -> Result<()> {
        let rows = batch
            .iter()
            .map(|s| {
                BoltRow::new()
                    .with("pg_id", s.pg_id)
                    .with("number", s.number)
                    .with("name_arabic", s.name_arabic.clone())
                    .with("revelation_order", s.revelation_order)
                    .with("period", s.period.clone())
                    .with("ayah_count", s.ayah_count)
                    .build()
            })
            .collect();
        self.upsert_batch(UPSERT_SURAHS, rows).await
    }

    async fn upsert_roots(&self, batch: &[RootNode]) -> Result<()> {
        let rows = batch
            .iter()
            .map(|r| {
                BoltRow::new()
                    .with("key", r.key.clone())
                    .with("pg_id", r.pg_id)
                    .with("arabic", r.arabic.clone())
                    .with("occurrences_count", r.occurrences_count)
                    .build()
            })
            .collect();
        self.upsert_batch(UPSERT_ROOTS, rows).await
    }

    async fn upsert_ayahs(&self, batch: &[AyahNode]) -> Result<()> {
        let rows = batch
            .iter()
            .map(|a| {
                BoltRow::new()
                    .with("pg_id", a.pg_id)
                    .with("surah_pg_id", a.surah_pg_id)
                    .with("surah_number", a.surah_number)
                    .with("ayah_number", a.verse_number)
                    .with("text_arabic", a.text_arabic.clone())
                    .build()
            })
            .collect();
        self.upsert_batch(UPSERT_AYAHS, rows).await
    }

    async fn upsert_words(&self, batch: &[WordOccurrence]) -> Result<()> {
        let rows = batch
            .iter()
            .map(|w| {
                BoltRow::new()
                    .with("word_pg_id", w.word_pg_id)
                    .with("ayah_pg_id", w.ayah_pg_id)
                    .with("position", w.position)
                    .with("text_arabic", w.text_arabic.clone())
                    .with_opt("pos", w.pos.as_deref())
                    .with_opt("lemma", w.lemma.as_deref())
                    .with_opt("root_key", w.root_key.as_deref())
                    .build()
            })
            .collect();
        self.upsert_batch(UPSERT_WORDS, rows).await
    }

    async fn upsert_shares_root(&self, batch: &[SharesRootEdge]) -> Result<()> {
        let rows = batch
            .iter()
            .map(|e| {
                BoltRow::new()
                    .with("ayah1_pg_id", e.ayah1_pg_id)
                    .with("ayah2_pg_id", e.ayah2_pg_id)
                    .with("root_pg_id", e.root_pg_id)
                    .with("root_key", e.root_key.clone())
                    .with("root_arabic", e.root_arabic.clone())
                    .with("count", e.count)
                    .build()
            })
            .collect();
        self.upsert_batch(UPSERT_SHARES_ROOT, rows).await
    }

    async fn save_last_sync_time(&self, at: &str) -> Result<()> {
        let query = Query::new(
            "MERGE (s:SyncState {id: 'graph'}) SET s.last_synced_at = $at".to_string(),
        )
        .param("at", at.to_string());
        self.client.execute(query).await
    }

    async fn last_sync_time(&self) -> Result<Option<String>> {
        let query = Query::new(
            "MATCH (s:SyncState {id: 'graph'}) RETURN s.last_synced_at AS at".to_string(),
        );
        self.client.query_scalar(query, "at").await
    }

    async fn counts(&self) -> Result<GraphCounts> {
        let mut counts = GraphCounts::default();
        for label in NodeLabel::ALL {
            let n = self
                .count(format!("MATCH (n:{}) RETURN count(n) AS c", label.as_str()))
                .await?;
            match label {
                NodeLabel::Surah => counts.surahs = n,
                NodeLabel::Ayah => counts.ayahs = n,
                NodeLabel::Word => counts.words = n,
                NodeLabel::Root => counts.roots = n,
            }
        }
        for rel in RelType::ALL {
            let n = self
                .count(format!("MATCH ()-[r:{}]->() RETURN count(r) AS c", rel.as_str()))
                .await?;
            match rel {
                RelType::HasAyah => counts.has_ayah = n,
                RelType::Contains => counts.contains = n,
                RelType::DerivedFrom => counts.derived_from = n,
                RelType::SharesRoot => counts.shares_root = n,
            }
        }
        Ok(counts)
    }

    async fn find_ayah(&self, surah: i64, verse: i64) -> Result<Option<AyahRef>> {
        let query = Query::new(
            "MATCH (a:Ayah {surah_number: $surah, ayah_number: $verse})
             RETURN a.pg_id AS a_id, a.surah_number AS a_surah, a.ayah_number AS a_verse
             ORDER BY a_id LIMIT 1"
                .to_string(),
        )
        .param("surah", surah)
        .param("verse", verse);

        let rows = self.client.query(query).await?;
        rows.first().map(|row| ayah_ref(row, "a")).transpose()
    }

    async fn shares_root_incident(&self, surah: i64, verse: i64) -> Result<Vec<SharesRootRow>> {
        let cypher = format!(
            "MATCH (:Ayah {{surah_number: $surah, ayah_number: $verse}})-[s:SHARES_ROOT]-(:Ayah)
             WITH startNode(s) AS a1, endNode(s) AS a2, s
             {}",
            SHARES_ROOT_RETURN
        );
        let query = Query::new(cypher).param("surah", surah).param("verse", verse);

        let rows = self.client.query(query).await?;
        rows.iter().map(shares_root_row).collect()
    }

    async fn find_root(&self, key: &str) -> Result<Option<RootSummary>> {
        let query = Query::new(
            "MATCH (r:Root {key: $key})
             OPTIONAL MATCH (a:Ayah)-[:CONTAINS]->(:Word)-[:DERIVED_FROM]->(r)
             RETURN r.pg_id AS pg_id, r.key AS key, r.arabic AS arabic,
                    r.occurrences_count AS occurrences_count,
                    count(DISTINCT a) AS total_ayahs"
                .to_string(),
        )
        .param("key", key.to_string());

        let rows = self.client.query(query).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let total: i64 = field_of(row, "total_ayahs")?;
        Ok(Some(RootSummary {
            pg_id: field_of(row, "pg_id")?,
            key: field_of(row, "key")?,
            arabic: field_of(row, "arabic")?,
            occurrences_count: field_of(row, "occurrences_count")?,
            total_ayahs: total as usize,
        }))
    }

    async fn ayahs_with_root(&self, key: &str, limit: Option<usize>) -> Result<Vec<AyahRef>> {
        let limit_clause = if limit.is_some() { "LIMIT $limit" } else { "" };
        let cypher = format!(
            "MATCH (a:Ayah)-[:CONTAINS]->(:Word)-[:DERIVED_FROM]->(:Root {{key: $key}})
             WITH DISTINCT a
             RETURN a.pg_id AS a_id, a.surah_number AS a_surah, a.ayah_number AS a_verse
             ORDER BY a_surah, a_verse, a_id
             {}",
            limit_clause
        );
        let mut query = Query::new(cypher).param("key", key.to_string());
        if let Some(n) = limit {
            query = query.param("limit", n as i64);
        }

        let rows = self.client.query(query).await?;
        rows.iter().map(|row| ayah_ref(row, "a")).collect()
    }

    async fn shares_root_within(&self, pg_ids: &[i64]) -> Result<Vec<SharesRootRow>> {
        if pg_ids.is_empty() {
            return Ok(Vec::new());
        }
        let cypher = format!(
            "MATCH (a1:Ayah)-[s:SHARES_ROOT]->(a2:Ayah)
             WHERE a1.pg_id IN $ids AND a2.pg_id IN $ids
             {}",
            SHARES_ROOT_RETURN
        );
        let query = Query::new(cypher).param("ids", pg_ids.to_vec());

        let rows = self.client.query(query).await?;
        rows.iter().map(shares_root_row).collect()
    }
}
