//! Pairwise shares-root computation.
//!
//! Occurrences are partitioned by root, then tallied per verse. For two
//! verses `a < b` under one root, the number of contributing word pairs is
//! every occurrence pair across the two verses minus the pairs made of the
//! same word:
//!
//! ```text
//! count(a, b) = total(a) * total(b) - sum_w per_word(a, w) * per_word(b, w)
//! ```
//!
//! Cost is quadratic in the number of verses per root, never in corpus size.

use std::collections::{BTreeMap, HashMap};

use wq_db::queries::roots::RootRow;
use wq_db::queries::words::OccurrenceRow;

use crate::model::SharesRootEdge;

#[derive(Debug, Default)]
struct VerseTally {
    total: i64,
    per_word: HashMap<i64, i64>,
}

impl VerseTally {
    fn add(&mut self, word_id: i64) {
        self.total += 1;
        *self.per_word.entry(word_id).or_insert(0) += 1;
    }

    /// Occurrence pairs between `self` and `other` that use different words.
    fn distinct_word_pairs(&self, other: &VerseTally) -> i64 {
        let same_word: i64 = self
            .per_word
            .iter()
            .filter_map(|(word, n)| other.per_word.get(word).map(|m| n * m))
            .sum();
        self.total * other.total - same_word
    }
}

/// Compute every `SHARES_ROOT` edge, sorted by (ayah1, ayah2, root id).
///
/// Occurrences whose word has no root are ignored. An occurrence pointing at
/// a root absent from `roots` is skipped with a warning.
pub fn compute_shares_root(occurrences: &[OccurrenceRow], roots: &[RootRow]) -> Vec<SharesRootEdge> {
    let root_index: HashMap<i64, &RootRow> = roots.iter().map(|r| (r.id, r)).collect();

    let mut by_root: BTreeMap<i64, BTreeMap<i64, VerseTally>> = BTreeMap::new();
    for occ in occurrences {
        let Some(root_id) = occ.root_id else {
            continue;
        };
        by_root
            .entry(root_id)
            .or_default()
            .entry(occ.ayah_id)
            .or_default()
            .add(occ.word_id);
    }

    let mut edges = Vec::new();
    for (root_id, verses) in &by_root {
        let Some(root) = root_index.get(root_id) else {
            tracing::warn!(root_id, "Occurrence references unknown root; skipped");
            continue;
        };

        let verses: Vec<(&i64, &VerseTally)> = verses.iter().collect();
        for (i, (ayah1, tally1)) in verses.iter().enumerate() {
            for (ayah2, tally2) in &verses[i + 1..] {
                let count = tally1.distinct_word_pairs(tally2);
                if count > 0 {
                    edges.push(SharesRootEdge {
                        ayah1_pg_id: **ayah1,
                        ayah2_pg_id: **ayah2,
                        root_pg_id: root.id,
                        root_key: root.key.clone(),
                        root_arabic: root.arabic.clone(),
                        count,
                    });
                }
            }
        }
    }

    edges.sort_by_key(|e| (e.ayah1_pg_id, e.ayah2_pg_id, e.root_pg_id));
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(id: i64, key: &str) -> RootRow {
        RootRow {
            id,
            key: key.to_string(),
            arabic: format!("{}-ar", key),
            occurrences_count: 0,
        }
    }

    fn occ(word_id: i64, ayah_id: i64, position: i64, root_id: Option<i64>) -> OccurrenceRow {
        OccurrenceRow {
            word_id,
            ayah_id,
            position,
            text_arabic: format!("w{}", word_id),
            pos: None,
            lemma: None,
            root_id,
            root_key: None,
        }
    }

    /// Direct self-join over occurrence pairs.
    fn naive(occurrences: &[OccurrenceRow]) -> BTreeMap<(i64, i64, i64), i64> {
        let mut out = BTreeMap::new();
        for o1 in occurrences {
            for o2 in occurrences {
                match (o1.root_id, o2.root_id) {
                    (Some(r1), Some(r2))
                        if r1 == r2 && o1.word_id != o2.word_id && o1.ayah_id < o2.ayah_id =>
                    {
                        *out.entry((o1.ayah_id, o2.ayah_id, r1)).or_insert(0) += 1;
                    }
                    _ => {}
                }
            }
        }
        out
    }

    #[test]
    fn test_fixture_edges() {
        let db = crate::fixtures::seed_snapshot();
        let snapshot = crate::sync::snapshot::Snapshot::load(&db).unwrap();
        let edges = compute_shares_root(&snapshot.occurrences, &snapshot.roots);

        let got: Vec<(i64, i64, &str, i64)> = edges
            .iter()
            .map(|e| (e.ayah1_pg_id, e.ayah2_pg_id, e.root_key.as_str(), e.count))
            .collect();
        assert_eq!(
            got,
            vec![(1, 2, "ktb", 2), (1, 2, "Elm", 2), (2, 3, "ktb", 1), (3, 5, "qwl", 1)]
        );
    }

    #[test]
    fn test_identical_word_gives_no_edge() {
        let occurrences = vec![occ(1, 10, 1, Some(7)), occ(1, 11, 1, Some(7))];
        assert!(compute_shares_root(&occurrences, &[root(7, "ktb")]).is_empty());
    }

    #[test]
    fn test_no_self_pairs() {
        let occurrences = vec![occ(1, 10, 1, Some(7)), occ(2, 10, 2, Some(7))];
        assert!(compute_shares_root(&occurrences, &[root(7, "ktb")]).is_empty());
    }

    #[test]
    fn test_rootless_words_ignored() {
        let occurrences = vec![occ(1, 10, 1, None), occ(2, 11, 1, None)];
        assert!(compute_shares_root(&occurrences, &[]).is_empty());
    }

    #[test]
    fn test_count_excludes_same_word_pairs() {
        // Verse 10: w1 twice, w2 once. Verse 11: w1 once, w3 once.
        let occurrences = vec![
            occ(1, 10, 1, Some(7)),
            occ(1, 10, 2, Some(7)),
            occ(2, 10, 3, Some(7)),
            occ(1, 11, 1, Some(7)),
            occ(3, 11, 2, Some(7)),
        ];
        let edges = compute_shares_root(&occurrences, &[root(7, "ktb")]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].count, 4);
    }

    #[test]
    fn test_matches_naive_self_join() {
        let mut occurrences = Vec::new();
        let mut position = 0;
        for ayah in 1..=6i64 {
            for word in 1..=8i64 {
                if (ayah * 3 + word * 5) % 4 == 0 || (ayah + word) % 5 == 0 {
                    position += 1;
                    let root = if word % 4 == 0 { None } else { Some(word % 3) };
                    occurrences.push(occ(word, ayah, position, root));
                }
            }
        }
        let roots = vec![root(0, "a"), root(1, "b"), root(2, "c")];

        let fast: BTreeMap<(i64, i64, i64), i64> = compute_shares_root(&occurrences, &roots)
            .into_iter()
            .map(|e| ((e.ayah1_pg_id, e.ayah2_pg_id, e.root_pg_id), e.count))
            .collect();
        assert_eq!(fast, naive(&occurrences));
    }

    #[test]
    fn test_unknown_root_skipped() {
        let occurrences = vec![occ(1, 10, 1, Some(99)), occ(2, 11, 1, Some(99))];
        assert!(compute_shares_root(&occurrences, &[root(7, "ktb")]).is_empty());
    }
}
