//! # WikiQuran Graph
//!
//! The shares-root property graph.
//!
//! Provides the full rebuild of the graph from the relational snapshot
//! (`sync`), the storage seam with its Neo4j and SQLite backends (`store`),
//! and the two traversal queries served to the visualizer (`queries`).

pub mod client;
pub mod model;
pub mod queries;
pub mod schema;
pub mod store;
pub mod sync;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use client::GraphClient;
pub use model::{AyahRef, GraphCounts, NodeLabel, RelType, RootSummary, SharesRootRow};
pub use queries::neighborhood::verse_neighborhood;
pub use queries::subgraph::root_subgraph;
pub use store::{open_store, GraphStore, Neo4jStore, SqliteGraphStore};
pub use sync::{run_full_sync, SyncOptions, SyncReport};
