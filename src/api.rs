//! HTTP API and page serving

mod assets;
mod handlers;
mod sse;
mod types;

pub use handlers::{create_router, create_setup_error_router};

use crate::llm::LlmService;
use crate::session::SessionRegistry;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub model_id: String,
}

impl AppState {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self {
            model_id: service.model_id().to_string(),
            sessions: Arc::new(SessionRegistry::new(service)),
        }
    }
}
