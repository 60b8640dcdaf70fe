//! Axum route handlers for previewing timeline computations.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::timeline::{compute_project_schedule, extract_total_weeks, parse_instant, ProjectSchedule};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub generated_date: String,
    pub timeline: String,
}

#[derive(Debug, Deserialize)]
pub struct DurationRequest {
    pub timeline: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationResponse {
    pub total_weeks: u32,
}

/// POST /api/v1/timeline/schedule
///
/// Computes the dated phase envelope for a timeline text without persisting anything.
pub async fn handle_schedule(
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ProjectSchedule>, AppError> {
    let generated_date = parse_instant(&request.generated_date)
        .map_err(|e| AppError::Validation(format!("generatedDate: {e}")))?;

    Ok(Json(compute_project_schedule(
        generated_date,
        &request.timeline,
    )))
}

/// POST /api/v1/timeline/duration
pub async fn handle_duration(Json(request): Json<DurationRequest>) -> Json<DurationResponse> {
    Json(DurationResponse {
        total_weeks: extract_total_weeks(&request.timeline),
    })
}
