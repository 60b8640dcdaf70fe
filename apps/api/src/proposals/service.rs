//! Proposal lifecycle — creation, manual edits, co-pilot refinement, pipeline moves.
//!
//! Every path that can change the timeline text recomputes the schedule from
//! scratch via `compute_project_schedule`, anchored at the proposal's generated date.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::proposals::copilot::ProposalCopilot;
use crate::proposals::models::{
    NewProposal, PipelineStage, Proposal, ProposalContent, ProposalEdit,
};
use crate::proposals::repository;
use crate::timeline::{compute_project_schedule, parse_instant, ProjectSchedule};

/// Whether an edit caused the schedule to be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleChange {
    Recomputed,
    Unchanged,
}

/// The merged state an edit would produce.
#[derive(Debug, Clone)]
pub struct EditPlan {
    pub title: String,
    pub client_name: String,
    pub content: ProposalContent,
    pub schedule: ProjectSchedule,
    pub change: ScheduleChange,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    pub proposal: Proposal,
    pub schedule_change: ScheduleChange,
}

#[derive(Debug, Clone, Serialize)]
pub struct CopilotOutcome {
    pub reply: String,
    pub updated_sections: Vec<String>,
    pub proposal: Proposal,
    pub schedule_change: ScheduleChange,
}

// ────────────────────────────────────────────────────────────────────────────
// Pure planning
// ────────────────────────────────────────────────────────────────────────────

/// Builds a new draft proposal with its initial schedule.
pub fn build_proposal(new: NewProposal, now: DateTime<Utc>) -> Result<Proposal, AppError> {
    if new.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let generated_date = match new.generated_date.as_deref() {
        Some(raw) => parse_instant(raw)
            .map_err(|e| AppError::Validation(format!("generated_date: {e}")))?,
        None => now,
    };

    let schedule = compute_project_schedule(generated_date, &new.content.timeline);

    Ok(Proposal {
        id: Uuid::new_v4(),
        user_id: new.user_id,
        title: new.title.trim().to_string(),
        client_name: new.client_name,
        rfp_text: new.rfp_text,
        content: new.content,
        generated_date,
        schedule,
        stage: PipelineStage::Draft,
        created_at: now,
        updated_at: now,
    })
}

/// Merges `edit` into `current`. The schedule is rebuilt only when the
/// timeline text actually differs from the stored one.
pub fn plan_edit(current: &Proposal, edit: ProposalEdit) -> Result<EditPlan, AppError> {
    let title = match edit.title {
        Some(title) if title.trim().is_empty() => {
            return Err(AppError::Validation("title cannot be empty".to_string()))
        }
        Some(title) => title.trim().to_string(),
        None => current.title.clone(),
    };

    let mut content = current.content.clone();
    let previous_timeline = std::mem::take(&mut content.timeline);

    content.executive_summary = edit
        .executive_summary
        .unwrap_or(content.executive_summary);
    content.technical_approach = edit
        .technical_approach
        .unwrap_or(content.technical_approach);
    content.pricing = edit.pricing.unwrap_or(content.pricing);
    content.team = edit.team.unwrap_or(content.team);
    for (key, text) in edit.additional_sections {
        if text.trim().is_empty() {
            content.additional_sections.remove(&key);
        } else {
            content.additional_sections.insert(key, text);
        }
    }

    let (timeline, schedule, change) = match edit.timeline {
        Some(timeline) if timeline != previous_timeline => {
            let schedule = compute_project_schedule(current.generated_date, &timeline);
            (timeline, schedule, ScheduleChange::Recomputed)
        }
        _ => (
            previous_timeline,
            current.schedule.clone(),
            ScheduleChange::Unchanged,
        ),
    };
    content.timeline = timeline;

    Ok(EditPlan {
        title,
        client_name: edit.client_name.unwrap_or_else(|| current.client_name.clone()),
        content,
        schedule,
        change,
    })
}

fn apply_plan(current: &Proposal, plan: EditPlan) -> Proposal {
    Proposal {
        title: plan.title,
        client_name: plan.client_name,
        content: plan.content,
        schedule: plan.schedule,
        ..current.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence-backed operations
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_proposal(pool: &PgPool, new: NewProposal) -> Result<Proposal, AppError> {
    let proposal = build_proposal(new, Utc::now())?;
    repository::insert_proposal(pool, &proposal).await?;

    info!(
        "Created proposal {} for user {} with {} phases ending {}",
        proposal.id,
        proposal.user_id,
        proposal.schedule.phases.len(),
        proposal.schedule.end_date
    );
    Ok(proposal)
}

pub async fn get_proposal(pool: &PgPool, id: Uuid) -> Result<Proposal, AppError> {
    repository::fetch_proposal(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))
}

pub async fn list_proposals(
    pool: &PgPool,
    user_id: Uuid,
    stage: Option<PipelineStage>,
) -> Result<Vec<Proposal>, AppError> {
    Ok(repository::list_proposals(pool, user_id, stage).await?)
}

/// Saves a manual edit. An empty edit is a no-op.
pub async fn apply_manual_edit(
    pool: &PgPool,
    id: Uuid,
    edit: ProposalEdit,
) -> Result<EditOutcome, AppError> {
    let current = get_proposal(pool, id).await?;
    if edit.is_empty() {
        return Ok(EditOutcome {
            proposal: current,
            schedule_change: ScheduleChange::Unchanged,
        });
    }

    let plan = plan_edit(&current, edit)?;
    let schedule_change = plan.change;
    let proposal = save(pool, &current, plan).await?;

    info!("Saved manual edit to proposal {id} (schedule {schedule_change:?})");
    Ok(EditOutcome {
        proposal,
        schedule_change,
    })
}

/// Runs one co-pilot turn and applies any section updates it returns.
pub async fn refine_with_copilot(
    pool: &PgPool,
    copilot: &dyn ProposalCopilot,
    id: Uuid,
    history: &[ChatMessage],
    message: &str,
) -> Result<CopilotOutcome, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let current = get_proposal(pool, id).await?;
    let turn = run_copilot_turn(copilot, &current, history, message).await?;

    let Some(plan) = turn.plan else {
        return Ok(CopilotOutcome {
            reply: turn.reply,
            updated_sections: turn.updated_sections,
            proposal: current,
            schedule_change: ScheduleChange::Unchanged,
        });
    };

    let schedule_change = plan.change;
    let proposal = save(pool, &current, plan).await?;

    info!(
        "Co-pilot updated {} section(s) of proposal {id} (schedule {schedule_change:?})",
        turn.updated_sections.len()
    );
    Ok(CopilotOutcome {
        reply: turn.reply,
        updated_sections: turn.updated_sections,
        proposal,
        schedule_change,
    })
}

/// A co-pilot answer plus the edit it implies, if any.
struct CopilotTurn {
    reply: String,
    updated_sections: Vec<String>,
    plan: Option<EditPlan>,
}

async fn run_copilot_turn(
    copilot: &dyn ProposalCopilot,
    current: &Proposal,
    history: &[ChatMessage],
    message: &str,
) -> Result<CopilotTurn, AppError> {
    let reply = copilot.refine(&current.content, history, message).await?;
    let updated_sections: Vec<String> = reply.updates.keys().cloned().collect();

    let edit = ProposalEdit::from_section_updates(reply.updates);
    let plan = if edit.is_empty() {
        None
    } else {
        Some(plan_edit(current, edit)?)
    };

    Ok(CopilotTurn {
        reply: reply.reply,
        updated_sections,
        plan,
    })
}

pub async fn update_stage(
    pool: &PgPool,
    id: Uuid,
    stage: PipelineStage,
) -> Result<Proposal, AppError> {
    let proposal = repository::set_stage(pool, id, stage)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))?;
    if stage.is_closed() {
        info!("Proposal {id} closed as {stage}");
    } else {
        info!("Proposal {id} moved to stage {stage}");
    }
    Ok(proposal)
}

async fn save(pool: &PgPool, current: &Proposal, plan: EditPlan) -> Result<Proposal, AppError> {
    let id = current.id;
    let updated = apply_plan(current, plan);
    repository::save_content(pool, &updated)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
