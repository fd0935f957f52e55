use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::AiGateway;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable AI gateway. Production uses `HttpAiGateway`; tests swap in stubs.
    pub gateway: Arc<dyn AiGateway>,
    pub store: Arc<RecordStore>,
}
