//! Axum route handlers for the Proposals API.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::calendar::{events_from_schedule, render_ics};
use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::proposals::models::{NewProposal, PipelineStage, Proposal, ProposalEdit};
use crate::proposals::service::{self, CopilotOutcome, EditOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    pub stage: Option<PipelineStage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct StageRequest {
    pub stage: PipelineStage,
}

/// POST /api/v1/proposals
pub async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<NewProposal>,
) -> Result<Json<Proposal>, AppError> {
    let proposal = service::create_proposal(&state.db, request).await?;
    Ok(Json(proposal))
}

/// GET /api/v1/proposals?user_id=&stage=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Proposal>>, AppError> {
    let proposals = service::list_proposals(&state.db, params.user_id, params.stage).await?;
    Ok(Json(proposals))
}

/// GET /api/v1/proposals/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(service::get_proposal(&state.db, id).await?))
}

/// PATCH /api/v1/proposals/:id
///
/// Manual save. Phases are recomputed only when the timeline text changed.
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(edit): Json<ProposalEdit>,
) -> Result<Json<EditOutcome>, AppError> {
    Ok(Json(service::apply_manual_edit(&state.db, id, edit).await?))
}

/// POST /api/v1/proposals/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<CopilotOutcome>, AppError> {
    let outcome = service::refine_with_copilot(
        &state.db,
        state.copilot.as_ref(),
        id,
        &request.history,
        &request.message,
    )
    .await?;
    Ok(Json(outcome))
}

/// PATCH /api/v1/proposals/:id/stage
pub async fn handle_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StageRequest>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(service::update_stage(&state.db, id, request.stage).await?))
}

/// GET /api/v1/proposals/:id/calendar.ics
pub async fn handle_calendar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let proposal = service::get_proposal(&state.db, id).await?;
    let events = events_from_schedule(proposal.id, &proposal.title, &proposal.schedule);
    let body = render_ics(&events, Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"proposal-{id}.ics\""),
            ),
        ],
        body,
    ))
}
