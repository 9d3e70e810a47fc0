//! Property-graph schema: node labels, relation types, and the records
//! written to and read from a [`GraphStore`](crate::GraphStore).
//!
//! ```text
//! (:Surah)-[:HAS_AYAH]->(:Ayah)-[:CONTAINS {position}]->(:Word)-[:DERIVED_FROM]->(:Root)
//! (:Ayah)-[:SHARES_ROOT {root_key, root_arabic, root_pg_id, count}]->(:Ayah)
//! ```
//!
//! Every node carries `pg_id`, the identifier of its source row, so the
//! graph can always be re-derived. Roots are keyed by transliteration.

use serde::Serialize;
use wq_db::queries::ayahs::AyahRow;
use wq_db::queries::roots::RootRow;
use wq_db::queries::surahs::SurahRow;
use wq_db::queries::words::OccurrenceRow;

/// Node labels of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLabel {
    Surah,
    Ayah,
    Word,
    Root,
}

impl NodeLabel {
    pub const ALL: [NodeLabel; 4] = [Self::Surah, Self::Ayah, Self::Word, Self::Root];

    /// The label as written in Cypher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surah => "Surah",
            Self::Ayah => "Ayah",
            Self::Word => "Word",
            Self::Root => "Root",
        }
    }
}

/// Relationship types of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelType {
    HasAyah,
    Contains,
    DerivedFrom,
    SharesRoot,
}

impl RelType {
    pub const ALL: [RelType; 4] = [
        Self::HasAyah,
        Self::Contains,
        Self::DerivedFrom,
        Self::SharesRoot,
    ];

    /// The relationship type as written in Cypher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasAyah => "HAS_AYAH",
            Self::Contains => "CONTAINS",
            Self::DerivedFrom => "DERIVED_FROM",
            Self::SharesRoot => "SHARES_ROOT",
        }
    }
}

// ---------------------------------------------------------------------------
// Write side
// ---------------------------------------------------------------------------

/// `(:Surah)` upsert record, keyed by `pg_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurahNode {
    pub pg_id: i64,
    pub number: i64,
    pub name_arabic: String,
    pub revelation_order: i64,
    pub period: String,
    pub ayah_count: i64,
}

impl From<&SurahRow> for SurahNode {
    fn from(row: &SurahRow) -> Self {
        Self {
            pg_id: row.id,
            number: row.number,
            name_arabic: row.name_arabic.clone(),
            revelation_order: row.revelation_order,
            period: row.period.clone(),
            ayah_count: row.ayah_count,
        }
    }
}

/// `(:Root)` upsert record, keyed by `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    pub key: String,
    pub pg_id: i64,
    pub arabic: String,
    pub occurrences_count: i64,
}

impl From<&RootRow> for RootNode {
    fn from(row: &RootRow) -> Self {
        Self {
            key: row.key.clone(),
            pg_id: row.id,
            arabic: row.arabic.clone(),
            occurrences_count: row.occurrences_count,
        }
    }
}

/// `(:Ayah)` upsert record plus the `HAS_AYAH` link to its surah.
#[derive(Debug, Clone, PartialEq)]
pub struct AyahNode {
    pub pg_id: i64,
    pub surah_pg_id: i64,
    pub surah_number: i64,
    pub verse_number: i64,
    pub text_arabic: String,
}

impl From<&AyahRow> for AyahNode {
    fn from(row: &AyahRow) -> Self {
        Self {
            pg_id: row.id,
            surah_pg_id: row.surah_id,
            surah_number: row.surah_number,
            verse_number: row.number,
            text_arabic: row.text_arabic.clone(),
        }
    }
}

/// One occurrence row: upserts the `(:Word)` node, the `CONTAINS` edge at
/// `position`, and `DERIVED_FROM` when the word has a root.
#[derive(Debug, Clone, PartialEq)]
pub struct WordOccurrence {
    pub word_pg_id: i64,
    pub ayah_pg_id: i64,
    pub position: i64,
    pub text_arabic: String,
    pub pos: Option<String>,
    pub lemma: Option<String>,
    pub root_key: Option<String>,
}

impl From<&OccurrenceRow> for WordOccurrence {
    fn from(row: &OccurrenceRow) -> Self {
        Self {
            word_pg_id: row.word_id,
            ayah_pg_id: row.ayah_id,
            position: row.position,
            text_arabic: row.text_arabic.clone(),
            pos: row.pos.clone(),
            lemma: row.lemma.clone(),
            root_key: row.root_key.clone(),
        }
    }
}

/// `SHARES_ROOT` upsert record, keyed by (`ayah1_pg_id`, `ayah2_pg_id`, `root_key`).
/// Always `ayah1_pg_id < ayah2_pg_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharesRootEdge {
    pub ayah1_pg_id: i64,
    pub ayah2_pg_id: i64,
    pub root_pg_id: i64,
    pub root_key: String,
    pub root_arabic: String,
    /// Contributing word pairs.
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Read side
// ---------------------------------------------------------------------------

/// A verse as seen by the traversal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AyahRef {
    pub pg_id: i64,
    pub surah_number: i64,
    pub verse_number: i64,
}

impl AyahRef {
    /// Sort key for recitation order.
    pub fn canonical_key(&self) -> (i64, i64) {
        (self.surah_number, self.verse_number)
    }

    pub fn is_verse(&self, surah: i64, verse: i64) -> bool {
        self.surah_number == surah && self.verse_number == verse
    }
}

/// A stored `SHARES_ROOT` edge with both endpoints resolved, in stored direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharesRootRow {
    pub ayah1: AyahRef,
    pub ayah2: AyahRef,
    pub root_pg_id: i64,
    pub root_key: String,
    pub root_arabic: String,
    pub count: i64,
}

/// A root node together with the number of verses that contain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootSummary {
    pub pg_id: i64,
    pub key: String,
    pub arabic: String,
    pub occurrences_count: i64,
    pub total_ayahs: usize,
}

/// Node counts per label and relationship counts per type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    pub surahs: usize,
    pub ayahs: usize,
    pub words: usize,
    pub roots: usize,
    pub has_ayah: usize,
    pub contains: usize,
    pub derived_from: usize,
    pub shares_root: usize,
}

impl GraphCounts {
    pub fn label(&self, label: NodeLabel) -> usize {
        match label {
            NodeLabel::Surah => self.surahs,
            NodeLabel::Ayah => self.ayahs,
            NodeLabel::Word => self.words,
            NodeLabel::Root => self.roots,
        }
    }

    pub fn rel(&self, rel: RelType) -> usize {
        match rel {
            RelType::HasAyah => self.has_ayah,
            RelType::Contains => self.contains,
            RelType::DerivedFrom => self.derived_from,
            RelType::SharesRoot => self.shares_root,
        }
    }

    pub fn nodes(&self) -> usize {
        NodeLabel::ALL.iter().map(|l| self.label(*l)).sum()
    }

    pub fn relationships(&self) -> usize {
        RelType::ALL.iter().map(|r| self.rel(*r)).sum()
    }
}
