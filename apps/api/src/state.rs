use std::sync::Arc;

use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upstream text generator. `LlmClient` in production, stubs in tests.
    pub generator: Arc<dyn TextGenerator>,
}
