//! Shared application state for HTTP adapters.

use std::sync::Arc;

use crate::workflow::engine::WorkflowEngine;

/// Shared state accessible by all API handlers.
pub struct AppStateInner {
    pub engine: WorkflowEngine,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    pub fn new(engine: WorkflowEngine) -> Self {
        Self { engine }
    }
}
