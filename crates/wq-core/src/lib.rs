//! WikiQuran Core Library
//!
//! Domain types shared by the synthesis job, the traversal engine and the
//! HTTP/CLI surfaces: configuration, errors, and the node/link result model.

pub mod config;
pub mod error;
pub mod network;

pub use config::WqConfig;
pub use error::{WqError, WqResult};
pub use network::model::{
    GraphCenter, GraphLink, GraphNode, NeighborhoodMeta, NeighborhoodResult, RootInfo,
    SelectionMode, SubgraphMeta, SubgraphResult,
};
pub use network::{deduplicate_roots, make_node_id};
