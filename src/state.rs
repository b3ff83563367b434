//! Shared state injected into every handler.

use std::sync::Arc;
use std::time::Instant;

use crate::application::services::LinkService;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// Moment the process started serving; owned by `main` and passed in.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, started_at: Instant) -> Self {
        Self {
            link_service,
            started_at,
        }
    }

    /// Whole seconds elapsed since [`AppState::started_at`].
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
