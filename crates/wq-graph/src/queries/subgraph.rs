//! Root-centered induced subgraph.
//!
//! Node selection is pluggable ([`SelectionMode`]); both modes share the same
//! link extraction over the selected set.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::debug;

use wq_core::network::model::{GraphNode, RootInfo, SelectionMode, SubgraphMeta, SubgraphResult};

use super::links::rank_links;
use crate::model::{AyahRef, SharesRootRow};
use crate::store::GraphStore;

/// Verses containing `root_key` and the shares-root links between them.
///
/// Returns `Ok(None)` when the root does not exist. A root with no selectable
/// verses yields an empty result. Fewer than two selected verses means no
/// links are looked up.
pub async fn root_subgraph(
    store: &dyn GraphStore,
    root_key: &str,
    max_nodes: usize,
    min_shared_roots: usize,
    limit: usize,
    mode: SelectionMode,
) -> Result<Option<SubgraphResult>> {
    let Some(root) = store
        .find_root(root_key)
        .await
        .with_context(|| format!("Failed to look up root '{}'", root_key))?
    else {
        debug!(root = root_key, "Root not found");
        return Ok(None);
    };

    let selected = select_nodes(store, root_key, max_nodes, mode).await?;

    let links = if selected.len() < 2 {
        Vec::new()
    } else {
        let ids: Vec<i64> = selected.iter().map(|a| a.pg_id).collect();
        let rows = store
            .shares_root_within(&ids)
            .await
            .context("Failed to read SHARES_ROOT edges within selection")?;
        rank_links(&rows, |r: &SharesRootRow| (r.ayah1, r.ayah2), min_shared_roots, limit)
            .into_iter()
            .map(|r| r.link)
            .collect()
    };

    let nodes: Vec<GraphNode> = selected
        .iter()
        .map(|a| GraphNode::new(a.surah_number, a.verse_number))
        .collect();

    debug!(
        root = root_key,
        %mode,
        candidates = root.total_ayahs,
        nodes = nodes.len(),
        links = links.len(),
        "Root subgraph"
    );

    Ok(Some(SubgraphResult {
        root: RootInfo {
            key: root.key,
            arabic: root.arabic,
            occurrences_count: root.occurrences_count,
            total_ayahs: root.total_ayahs,
        },
        meta: SubgraphMeta {
            mode,
            max_nodes,
            min_shared_roots,
            limit,
            total_nodes: nodes.len(),
            total_links: links.len(),
        },
        nodes,
        links,
    }))
}

async fn select_nodes(
    store: &dyn GraphStore,
    root_key: &str,
    max_nodes: usize,
    mode: SelectionMode,
) -> Result<Vec<AyahRef>> {
    match mode {
        SelectionMode::CanonicalOrder => store
            .ayahs_with_root(root_key, Some(max_nodes))
            .await
            .context("Failed to list verses of root"),
        SelectionMode::Connectivity => {
            let candidates = store
                .ayahs_with_root(root_key, None)
                .await
                .context("Failed to list verses of root")?;
            if candidates.len() < 2 {
                return Ok(Vec::new());
            }
            let ids: Vec<i64> = candidates.iter().map(|a| a.pg_id).collect();
            let rows = store
                .shares_root_within(&ids)
                .await
                .context("Failed to read SHARES_ROOT edges among candidates")?;
            Ok(rank_by_connectivity(&candidates, &rows, max_nodes))
        }
    }
}

/// Rank candidates by the number of `SHARES_ROOT` edges joining them to other
/// candidates, highest first, ties in canonical order. Candidates without any
/// such edge are dropped.
pub fn rank_by_connectivity(
    candidates: &[AyahRef],
    rows: &[SharesRootRow],
    max_nodes: usize,
) -> Vec<AyahRef> {
    let mut degree: HashMap<i64, usize> = candidates.iter().map(|a| (a.pg_id, 0)).collect();
    for row in rows {
        if degree.contains_key(&row.ayah1.pg_id) && degree.contains_key(&row.ayah2.pg_id) {
            *degree.entry(row.ayah1.pg_id).or_default() += 1;
            *degree.entry(row.ayah2.pg_id).or_default() += 1;
        }
    }

    let mut ranked: Vec<(usize, AyahRef)> = candidates
        .iter()
        .map(|a| (degree.get(&a.pg_id).copied().unwrap_or(0), *a))
        .filter(|(d, _)| *d > 0)
        .collect();
    ranked.sort_by(|(da, a), (db, b)| {
        db.cmp(da)
            .then_with(|| a.canonical_key().cmp(&b.canonical_key()))
            .then_with(|| a.pg_id.cmp(&b.pg_id))
    });
    ranked.into_iter().take(max_nodes).map(|(_, a)| a).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn ids(result: &SubgraphResult) -> Vec<&str> {
        result.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_canonical_order_subgraph() {
        let store = fixtures::synced_store().await;
        let result = root_subgraph(&store, "ktb", 30, 1, 100, SelectionMode::CanonicalOrder)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(ids(&result), vec!["2:2", "3:7", "96:1"]);
        assert_eq!(result.root.arabic, "كتب");
        assert_eq!(result.root.total_ayahs, 3);
        assert_eq!(result.links.len(), 2);
        assert_eq!(
            (result.links[0].source.as_str(), result.links[0].target.as_str(), result.links[0].weight),
            ("2:2", "3:7", 2)
        );
        assert_eq!(
            (result.links[1].source.as_str(), result.links[1].target.as_str(), result.links[1].weight),
            ("3:7", "96:1", 1)
        );
        assert_eq!(result.meta.total_nodes, 3);
        assert_eq!(result.meta.total_links, 2);
        assert_eq!(result.meta.mode, SelectionMode::CanonicalOrder);
    }

    #[tokio::test]
    async fn test_link_threshold_applies() {
        let store = fixtures::synced_store().await;
        let result = root_subgraph(&store, "ktb", 30, 2, 100, SelectionMode::CanonicalOrder)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.links[0].root_keys, vec!["ktb", "Elm"]);
    }

    #[tokio::test]
    async fn test_single_node_skips_links() {
        let store = fixtures::synced_store().await;
        let result = root_subgraph(&store, "ktb", 1, 1, 100, SelectionMode::CanonicalOrder)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ids(&result), vec!["2:2"]);
        assert!(result.links.is_empty());
        assert_eq!(result.root.total_ayahs, 3);
    }

    #[tokio::test]
    async fn test_connectivity_ranks_by_induced_degree() {
        let store = fixtures::synced_store().await;
        let result = root_subgraph(&store, "ktb", 30, 1, 100, SelectionMode::Connectivity)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ids(&result), vec!["3:7", "2:2", "96:1"]);
        assert_eq!(result.links.len(), 2);

        let top = root_subgraph(&store, "ktb", 1, 1, 100, SelectionMode::Connectivity)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ids(&top), vec!["3:7"]);
        assert!(top.links.is_empty());
    }

    #[tokio::test]
    async fn test_connectivity_without_internal_edges_is_empty() {
        let store = fixtures::synced_store().await;
        let result = root_subgraph(&store, "Hmd", 30, 1, 100, SelectionMode::Connectivity)
            .await
            .unwrap()
            .unwrap();
        assert!(result.nodes.is_empty());
        assert!(result.links.is_empty());
        assert_eq!(result.root.total_ayahs, 1);
    }

    #[tokio::test]
    async fn test_root_without_verses_is_empty_not_missing() {
        let store = fixtures::synced_store().await;
        let result = root_subgraph(&store, "nwr", 30, 1, 100, SelectionMode::CanonicalOrder)
            .await
            .unwrap()
            .unwrap();
        assert!(result.nodes.is_empty());
        assert_eq!(result.root.total_ayahs, 0);
    }

    #[tokio::test]
    async fn test_unknown_root_is_not_found() {
        let store = fixtures::synced_store().await;
        let result = root_subgraph(&store, "zzz_nonexistent", 30, 1, 100, SelectionMode::Connectivity)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_rank_by_connectivity_tie_break() {
        let a = AyahRef { pg_id: 30, surah_number: 5, verse_number: 1 };
        let b = AyahRef { pg_id: 10, surah_number: 2, verse_number: 9 };
        let c = AyahRef { pg_id: 20, surah_number: 2, verse_number: 1 };
        let row = |x: AyahRef, y: AyahRef| SharesRootRow {
            ayah1: x,
            ayah2: y,
            root_pg_id: 1,
            root_key: "r".to_string(),
            root_arabic: "ر".to_string(),
            count: 1,
        };
        // Every candidate has degree 1 except a, which has 2.
        let rows = vec![row(b, a), row(c, a)];
        let ranked = rank_by_connectivity(&[b, c, a], &rows, 10);
        let keys: Vec<(i64, i64)> = ranked.iter().map(|x| x.canonical_key()).collect();
        assert_eq!(keys, vec![(5, 1), (2, 1), (2, 9)]);
    }

    #[test]
    fn test_rank_by_connectivity_drops_isolated_candidates() {
        let a = AyahRef { pg_id: 1, surah_number: 2, verse_number: 2 };
        let b = AyahRef { pg_id: 2, surah_number: 3, verse_number: 7 };
        let c = AyahRef { pg_id: 3, surah_number: 1, verse_number: 1 };
        let rows = vec![SharesRootRow {
            ayah1: a,
            ayah2: b,
            root_pg_id: 1,
            root_key: "ktb".to_string(),
            root_arabic: "كتب".to_string(),
            count: 2,
        }];
        // c sorts first canonically but has no edge inside the candidate set.
        let ranked = rank_by_connectivity(&[c, b, a], &rows, 10);
        assert_eq!(ranked, vec![a, b]);
    }
}
