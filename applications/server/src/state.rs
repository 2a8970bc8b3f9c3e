/// Shared application state
use movieland_core::GenreStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub genres: Arc<dyn GenreStore>,
}

impl AppState {
    pub fn new(genres: Arc<dyn GenreStore>) -> Self {
        Self { genres }
    }
}
