//! Single-verse expansion.

use anyhow::{Context, Result};
use tracing::debug;

use wq_core::network::model::{GraphCenter, GraphNode, NeighborhoodMeta, NeighborhoodResult};

use super::links::rank_links;
use crate::model::SharesRootRow;
use crate::store::GraphStore;

/// Verses sharing at least `min_shared_roots` distinct roots with `surah:verse`,
/// strongest first, at most `limit` of them.
///
/// Returns `Ok(None)` when the verse does not exist. An existing verse without
/// qualifying neighbors yields a result holding only the focal node.
pub async fn verse_neighborhood(
    store: &dyn GraphStore,
    surah: i64,
    verse: i64,
    min_shared_roots: usize,
    limit: usize,
) -> Result<Option<NeighborhoodResult>> {
    let rows = store
        .shares_root_incident(surah, verse)
        .await
        .with_context(|| format!("Failed to read SHARES_ROOT edges of {}:{}", surah, verse))?;

    if rows.is_empty() && store.find_ayah(surah, verse).await?.is_none() {
        debug!(surah, verse, "Verse not found");
        return Ok(None);
    }

    let orient = |row: &SharesRootRow| {
        if row.ayah1.is_verse(surah, verse) {
            (row.ayah1, row.ayah2)
        } else {
            (row.ayah2, row.ayah1)
        }
    };
    let ranked = rank_links(&rows, orient, min_shared_roots, limit);

    let mut nodes = Vec::with_capacity(ranked.len() + 1);
    nodes.push(GraphNode::new(surah, verse));
    nodes.extend(
        ranked
            .iter()
            .map(|r| GraphNode::new(r.target.surah_number, r.target.verse_number)),
    );
    let links: Vec<_> = ranked.into_iter().map(|r| r.link).collect();

    debug!(surah, verse, rows = rows.len(), links = links.len(), "Verse neighborhood");

    Ok(Some(NeighborhoodResult {
        center: GraphCenter::new(surah, verse),
        nodes,
        meta: NeighborhoodMeta {
            min_shared_roots,
            limit,
            total_links: links.len(),
        },
        links,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn test_neighbor_weight_is_distinct_root_count() {
        let store = fixtures::synced_store().await;
        let result = verse_neighborhood(&store, 2, 2, 1, 50).await.unwrap().unwrap();

        assert_eq!(result.center.id, "2:2");
        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["2:2", "3:7"]);
        assert_eq!(result.links.len(), 1);

        let link = &result.links[0];
        assert_eq!(link.source, "2:2");
        assert_eq!(link.target, "3:7");
        assert_eq!(link.weight, 2);
        assert_eq!(link.root_keys, vec!["ktb", "Elm"]);
        assert_eq!(link.root_arabic, vec!["كتب", "علم"]);
        assert_eq!(result.meta.total_links, 1);
    }

    #[tokio::test]
    async fn test_focal_verse_as_edge_target() {
        let store = fixtures::synced_store().await;
        let result = verse_neighborhood(&store, 96, 1, 1, 50).await.unwrap().unwrap();

        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["96:1", "3:7", "112:1"]);
        assert!(result.links.iter().all(|l| l.source == "96:1"));
        assert!(result.links.iter().all(|l| l.weight == 1));
    }

    #[tokio::test]
    async fn test_threshold_and_limit() {
        let store = fixtures::synced_store().await;

        let strict = verse_neighborhood(&store, 3, 7, 2, 50).await.unwrap().unwrap();
        assert_eq!(strict.links.len(), 1);
        assert_eq!(strict.links[0].target, "2:2");

        let capped = verse_neighborhood(&store, 3, 7, 1, 1).await.unwrap().unwrap();
        assert_eq!(capped.links.len(), 1);
        assert_eq!(capped.links[0].target, "2:2");
        assert_eq!(capped.nodes.len(), 2);
        assert_eq!(capped.meta.limit, 1);
    }

    #[tokio::test]
    async fn test_isolated_verse_returns_focal_only() {
        let store = fixtures::synced_store().await;
        let result = verse_neighborhood(&store, 2, 3, 1, 50).await.unwrap().unwrap();

        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].id, "2:3");
        assert_eq!(result.nodes[0].group, 2);
        assert!(result.links.is_empty());
    }

    #[tokio::test]
    async fn test_threshold_filters_everything() {
        let store = fixtures::synced_store().await;
        let result = verse_neighborhood(&store, 96, 1, 5, 50).await.unwrap().unwrap();
        assert_eq!(result.nodes.len(), 1);
        assert!(result.links.is_empty());
    }

    #[tokio::test]
    async fn test_missing_verse_is_not_found() {
        let store = fixtures::synced_store().await;
        assert!(verse_neighborhood(&store, 9, 9, 1, 50).await.unwrap().is_none());
    }
}
