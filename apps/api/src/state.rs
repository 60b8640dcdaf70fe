use std::sync::Arc;

use sqlx::PgPool;

use crate::proposals::copilot::ProposalCopilot;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Co-pilot used for chat refinement. Default: `LlmCopilot` over the shared LLM client.
    pub copilot: Arc<dyn ProposalCopilot>,
}
