//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the parsed config and the tracker seam. Board state itself is
//! not shared: each websocket session owns its board, and REST requests
//! decode theirs from the URL.

use std::sync::Arc;

use crate::board::controller::BoardController;
use crate::config::AppConfig;
use crate::tracker::QueryService;

/// Shared application state. Clone is required by Axum; inner fields are
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tracker: Arc<dyn QueryService>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, tracker: Arc<dyn QueryService>) -> Self {
        Self { config: Arc::new(config), tracker }
    }

    /// Tracker origin used for issue links.
    #[must_use]
    pub fn tracker_url(&self) -> &str {
        &self.config.tracker.base_url
    }

    /// A fresh, empty board bound to this deployment's URLs and render mode.
    #[must_use]
    pub fn new_board(&self) -> BoardController {
        BoardController::new(self.config.public_url.clone(), self.tracker_url(), self.config.render_mode)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
