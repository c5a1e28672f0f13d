use std::sync::Arc;

use crate::interview::runner::RunnerRegistry;
use crate::interview::store::SessionStore;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam. Production wires `PgSessionStore`; tests use doubles.
    pub store: Arc<dyn SessionStore>,
    pub llm: LlmClient,
    /// Live interview runtimes, keyed by session id.
    pub runners: RunnerRegistry,
}
