//! Application state for the web layer.

use crate::router::MetroRouter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route queries over the current graph
    pub router: MetroRouter,
}

impl AppState {
    /// Create a new app state.
    pub fn new(router: MetroRouter) -> Self {
        Self { router }
    }
}
