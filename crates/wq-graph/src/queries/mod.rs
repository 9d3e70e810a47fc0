//! Traversal queries served to the verse-network visualizer.
//!
//! Each query issues a small fixed sequence of store reads and does all
//! grouping, deduplication and ranking in memory.

pub mod links;
pub mod neighborhood;
pub mod subgraph;
