//! Link assembly shared by both traversal queries.

use std::collections::HashMap;

use wq_core::network::model::GraphLink;
use wq_core::make_node_id;

use crate::model::{AyahRef, SharesRootRow};

/// A link together with its resolved endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedLink {
    pub source: AyahRef,
    pub target: AyahRef,
    pub link: GraphLink,
}

/// Group raw `SHARES_ROOT` rows into one link per verse pair, keep links with
/// at least `min_shared_roots` distinct roots, order by weight descending and
/// keep the first `limit`.
///
/// `orient` decides which endpoint of a row is the link source. Root lists
/// keep the order rows arrive in. Equal weights fall back to the canonical
/// order of source, then target.
pub fn rank_links<F>(
    rows: &[SharesRootRow],
    orient: F,
    min_shared_roots: usize,
    limit: usize,
) -> Vec<RankedLink>
where
    F: Fn(&SharesRootRow) -> (AyahRef, AyahRef),
{
    struct Pair {
        source: AyahRef,
        target: AyahRef,
        keys: Vec<String>,
        arabic: Vec<String>,
    }

    let mut index: HashMap<(i64, i64), usize> = HashMap::new();
    let mut pairs: Vec<Pair> = Vec::new();
    for row in rows {
        let (source, target) = orient(row);
        let slot = *index.entry((source.pg_id, target.pg_id)).or_insert_with(|| {
            pairs.push(Pair {
                source,
                target,
                keys: Vec::new(),
                arabic: Vec::new(),
            });
            pairs.len() - 1
        });
        pairs[slot].keys.push(row.root_key.clone());
        pairs[slot].arabic.push(row.root_arabic.clone());
    }

    let mut ranked: Vec<RankedLink> = pairs
        .into_iter()
        .map(|p| RankedLink {
            link: GraphLink::from_roots(
                make_node_id(p.source.surah_number, p.source.verse_number),
                make_node_id(p.target.surah_number, p.target.verse_number),
                &p.keys,
                &p.arabic,
            ),
            source: p.source,
            target: p.target,
        })
        .filter(|r| r.link.weight >= min_shared_roots)
        .collect();

    ranked.sort_by(|a, b| {
        b.link
            .weight
            .cmp(&a.link.weight)
            .then_with(|| a.source.canonical_key().cmp(&b.source.canonical_key()))
            .then_with(|| a.target.canonical_key().cmp(&b.target.canonical_key()))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ayah(pg_id: i64, surah: i64, verse: i64) -> AyahRef {
        AyahRef {
            pg_id,
            surah_number: surah,
            verse_number: verse,
        }
    }

    fn row(a1: AyahRef, a2: AyahRef, root_pg_id: i64, key: &str) -> SharesRootRow {
        SharesRootRow {
            ayah1: a1,
            ayah2: a2,
            root_pg_id,
            root_key: key.to_string(),
            root_arabic: format!("{}-ar", key),
            count: 1,
        }
    }

    fn stored(r: &SharesRootRow) -> (AyahRef, AyahRef) {
        (r.ayah1, r.ayah2)
    }

    #[test]
    fn test_groups_per_pair_and_dedups() {
        let (a, b, c) = (ayah(1, 2, 2), ayah(2, 3, 7), ayah(3, 96, 1));
        let rows = vec![
            row(a, b, 1, "ktb"),
            row(a, b, 2, "Elm"),
            row(a, b, 1, "ktb"),
            row(b, c, 1, "ktb"),
        ];
        let links = rank_links(&rows, stored, 1, 10);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].link.source, "2:2");
        assert_eq!(links[0].link.target, "3:7");
        assert_eq!(links[0].link.weight, 2);
        assert_eq!(links[0].link.root_keys, vec!["ktb", "Elm"]);
        assert_eq!(links[0].link.root_arabic, vec!["ktb-ar", "Elm-ar"]);
        assert_eq!(links[1].link.weight, 1);
    }

    #[test]
    fn test_threshold_applies_to_distinct_roots() {
        let (a, b) = (ayah(1, 2, 2), ayah(2, 3, 7));
        let rows = vec![row(a, b, 1, "ktb"), row(a, b, 1, "ktb")];
        assert!(rank_links(&rows, stored, 2, 10).is_empty());
    }

    #[test]
    fn test_ties_follow_canonical_order() {
        let focal = ayah(50, 2, 2);
        let rows = vec![
            row(focal, ayah(9, 40, 1), 1, "ktb"),
            row(ayah(7, 1, 1), focal, 1, "ktb"),
            row(focal, ayah(8, 3, 7), 1, "ktb"),
        ];
        let orient = |r: &SharesRootRow| {
            if r.ayah1.pg_id == focal.pg_id {
                (r.ayah1, r.ayah2)
            } else {
                (r.ayah2, r.ayah1)
            }
        };
        let targets: Vec<String> = rank_links(&rows, orient, 1, 10)
            .into_iter()
            .map(|r| r.link.target)
            .collect();
        assert_eq!(targets, vec!["1:1", "3:7", "40:1"]);
    }

    #[test]
    fn test_limit_truncates_after_sort() {
        let focal = ayah(1, 1, 1);
        let rows = vec![
            row(focal, ayah(2, 1, 2), 1, "a"),
            row(focal, ayah(3, 1, 3), 1, "a"),
            row(focal, ayah(3, 1, 3), 2, "b"),
        ];
        let links = rank_links(&rows, stored, 1, 1);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link.target, "1:3");
        assert_eq!(links[0].link.weight, 2);
    }
}
