//! Post-rebuild consistency check between snapshot and graph.
//!
//! Advisory only: mismatches are reported, never fatal.

use serde::Serialize;
use std::collections::HashSet;

use super::snapshot::Snapshot;
use crate::model::{GraphCounts, NodeLabel, RelType};

/// Whether a check counts nodes or relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Node,
    Relationship,
}

/// One expected-vs-actual count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountCheck {
    pub name: &'static str,
    pub kind: CheckKind,
    pub expected: usize,
    pub actual: usize,
}

impl CountCheck {
    pub fn is_match(&self) -> bool {
        self.expected == self.actual
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CountCheck>,
}

impl ValidationReport {
    /// Compare per label and per relationship type.
    pub fn compare(expected: &GraphCounts, actual: &GraphCounts) -> Self {
        let mut checks = Vec::with_capacity(NodeLabel::ALL.len() + RelType::ALL.len());
        for label in NodeLabel::ALL {
            checks.push(CountCheck {
                name: label.as_str(),
                kind: CheckKind::Node,
                expected: expected.label(label),
                actual: actual.label(label),
            });
        }
        for rel in RelType::ALL {
            checks.push(CountCheck {
                name: rel.as_str(),
                kind: CheckKind::Relationship,
                expected: expected.rel(rel),
                actual: actual.rel(rel),
            });
        }
        Self { checks }
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &CountCheck> {
        self.checks.iter().filter(|c| !c.is_match())
    }

    pub fn is_consistent(&self) -> bool {
        self.mismatches().next().is_none()
    }
}

/// Counts the graph should hold after a complete rebuild of `snapshot`.
///
/// Node counts come straight from the source tables. `CONTAINS` counts
/// distinct (ayah, word, position) facts and `DERIVED_FROM` counts distinct
/// rooted words seen in occurrences.
pub fn expected_counts(snapshot: &Snapshot, shares_root_edges: usize) -> GraphCounts {
    let contains: HashSet<(i64, i64, i64)> = snapshot
        .occurrences
        .iter()
        .map(|o| (o.ayah_id, o.word_id, o.position))
        .collect();
    let derived_from: HashSet<i64> = snapshot
        .occurrences
        .iter()
        .filter(|o| o.root_id.is_some())
        .map(|o| o.word_id)
        .collect();

    GraphCounts {
        surahs: snapshot.table_counts.surahs,
        ayahs: snapshot.table_counts.ayahs,
        words: snapshot.table_counts.words,
        roots: snapshot.table_counts.roots,
        has_ayah: snapshot.ayahs.len(),
        contains: contains.len(),
        derived_from: derived_from.len(),
        shares_root: shares_root_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(ayahs: usize, shares_root: usize) -> GraphCounts {
        GraphCounts {
            surahs: 2,
            ayahs,
            words: 3,
            roots: 1,
            has_ayah: ayahs,
            contains: 4,
            derived_from: 2,
            shares_root,
        }
    }

    #[test]
    fn test_consistent_report() {
        let report = ValidationReport::compare(&counts(5, 3), &counts(5, 3));
        assert_eq!(report.checks.len(), 8);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_mismatches_are_listed() {
        let report = ValidationReport::compare(&counts(5, 3), &counts(4, 3));
        let names: Vec<&str> = report.mismatches().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ayah", "HAS_AYAH"]);
        assert!(!report.is_consistent());
    }

    #[test]
    fn test_expected_counts_for_fixture() {
        let db = crate::fixtures::seed_snapshot();
        let snapshot = Snapshot::load(&db).unwrap();
        let expected = expected_counts(&snapshot, 4);

        assert_eq!(expected.surahs, 4);
        assert_eq!(expected.ayahs, 5);
        assert_eq!(expected.roots, 5);
        assert_eq!(expected.words, 8);
        assert_eq!(expected.has_ayah, 5);
        assert_eq!(expected.contains, 12);
        assert_eq!(expected.derived_from, 7);
        assert_eq!(expected.shares_root, 4);
    }
}
