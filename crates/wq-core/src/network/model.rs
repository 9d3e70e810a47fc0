//! Node/link result model returned by the traversal engine.
//!
//! Shapes are what the force-graph visualizer consumes: nodes keyed by a
//! `"<surah>:<verse>"` id and grouped by surah, links carrying the shared
//! roots in both transliteration and Arabic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{deduplicate_roots, make_node_id};

/// A verse node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub surah_number: i64,
    pub verse_number: i64,
    /// Surah number, used client-side for coloring.
    pub group: i64,
}

impl GraphNode {
    pub fn new(surah_number: i64, verse_number: i64) -> Self {
        Self {
            id: make_node_id(surah_number, verse_number),
            surah_number,
            verse_number,
            group: surah_number,
        }
    }
}

/// A shares-root link between two verse nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Number of distinct shared roots.
    pub weight: usize,
    pub root_keys: Vec<String>,
    pub root_arabic: Vec<String>,
}

impl GraphLink {
    /// Build a link from raw collected root lists. Duplicate keys are dropped
    /// and the weight is the number of distinct keys that remain.
    pub fn from_roots(
        source: impl Into<String>,
        target: impl Into<String>,
        root_keys: &[String],
        root_arabic: &[String],
    ) -> Self {
        let (root_keys, root_arabic) = deduplicate_roots(root_keys, root_arabic);
        Self {
            source: source.into(),
            target: target.into(),
            weight: root_keys.len(),
            root_keys,
            root_arabic,
        }
    }
}

/// The focal verse of a neighborhood query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphCenter {
    pub id: String,
    pub surah_number: i64,
    pub verse_number: i64,
}

impl GraphCenter {
    pub fn new(surah_number: i64, verse_number: i64) -> Self {
        Self {
            id: make_node_id(surah_number, verse_number),
            surah_number,
            verse_number,
        }
    }
}

/// Parameters applied to a neighborhood query, echoed back with the count returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodMeta {
    pub min_shared_roots: usize,
    pub limit: usize,
    pub total_links: usize,
}

/// Result of `GetVerseNeighborhood`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodResult {
    pub center: GraphCenter,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub meta: NeighborhoodMeta,
}

/// The root a subgraph was built around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootInfo {
    pub key: String,
    pub arabic: String,
    pub occurrences_count: i64,
    /// Verses containing the root, before any `max_nodes` cut.
    pub total_ayahs: usize,
}

/// How the subgraph sampler picks its verses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    /// First verses in (surah, verse) order.
    #[default]
    #[serde(rename = "mushaf", alias = "canonical")]
    CanonicalOrder,
    /// Verses with the most shares-root edges to other verses of the same root.
    #[serde(rename = "connected", alias = "connectivity")]
    Connectivity,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanonicalOrder => "mushaf",
            Self::Connectivity => "connected",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mushaf" | "canonical" | "canonical-order" => Ok(Self::CanonicalOrder),
            "connected" | "connectivity" => Ok(Self::Connectivity),
            other => Err(format!(
                "unknown selection mode '{}' (expected mushaf or connected)",
                other
            )),
        }
    }
}

/// Parameters applied to a subgraph query, echoed back with the counts returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphMeta {
    pub mode: SelectionMode,
    pub max_nodes: usize,
    pub min_shared_roots: usize,
    pub limit: usize,
    pub total_nodes: usize,
    pub total_links: usize,
}

/// Result of `GetRootSubgraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphResult {
    pub root: RootInfo,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub meta: SubgraphMeta,
}
