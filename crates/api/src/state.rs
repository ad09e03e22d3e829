//! Application state.

use std::sync::Arc;

use pipeline::Pipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator shared by all requests; holds only stateless clients
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
