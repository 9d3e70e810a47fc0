//! Application state.

use std::sync::Arc;
use wq_graph::GraphStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GraphStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }
}
