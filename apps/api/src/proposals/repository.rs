//! Postgres persistence for proposals. Rows are converted to `Proposal` on the way out.

use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::proposals::models::{PipelineStage, Proposal, ProposalRow};

pub async fn insert_proposal(pool: &PgPool, proposal: &Proposal) -> Result<()> {
    let content = &proposal.content;
    let schedule = &proposal.schedule;

    sqlx::query(
        r#"
        INSERT INTO proposals
            (id, user_id, title, client_name, rfp_text,
             executive_summary, technical_approach, timeline, pricing, team,
             additional_sections, generated_date, project_start, project_end, phases,
             stage, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        "#,
    )
    .bind(proposal.id)
    .bind(proposal.user_id)
    .bind(&proposal.title)
    .bind(&proposal.client_name)
    .bind(&proposal.rfp_text)
    .bind(&content.executive_summary)
    .bind(&content.technical_approach)
    .bind(&content.timeline)
    .bind(&content.pricing)
    .bind(&content.team)
    .bind(Json(&content.additional_sections))
    .bind(proposal.generated_date)
    .bind(schedule.start_date)
    .bind(schedule.end_date)
    .bind(Json(&schedule.phases))
    .bind(proposal.stage.as_str())
    .bind(proposal.created_at)
    .bind(proposal.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_proposal(pool: &PgPool, id: Uuid) -> Result<Option<Proposal>> {
    sqlx::query_as::<_, ProposalRow>("SELECT * FROM proposals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(Proposal::try_from)
        .transpose()
}

/// Pipeline listing for the CRM dashboard, newest first.
pub async fn list_proposals(
    pool: &PgPool,
    user_id: Uuid,
    stage: Option<PipelineStage>,
) -> Result<Vec<Proposal>> {
    sqlx::query_as::<_, ProposalRow>(
        r#"
        SELECT *
        FROM proposals
        WHERE user_id = $1 AND ($2::text IS NULL OR stage = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(stage.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(Proposal::try_from)
    .collect()
}

/// Overwrites the editable fields and the schedule of an existing proposal.
pub async fn save_content(pool: &PgPool, proposal: &Proposal) -> Result<Option<Proposal>> {
    let content = &proposal.content;
    let schedule = &proposal.schedule;

    sqlx::query_as::<_, ProposalRow>(
        r#"
        UPDATE proposals
        SET title = $2, client_name = $3,
            executive_summary = $4, technical_approach = $5, timeline = $6,
            pricing = $7, team = $8, additional_sections = $9,
            project_start = $10, project_end = $11, phases = $12,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(proposal.id)
    .bind(&proposal.title)
    .bind(&proposal.client_name)
    .bind(&content.executive_summary)
    .bind(&content.technical_approach)
    .bind(&content.timeline)
    .bind(&content.pricing)
    .bind(&content.team)
    .bind(Json(&content.additional_sections))
    .bind(schedule.start_date)
    .bind(schedule.end_date)
    .bind(Json(&schedule.phases))
    .fetch_optional(pool)
    .await?
    .map(Proposal::try_from)
    .transpose()
}

pub async fn set_stage(pool: &PgPool, id: Uuid, stage: PipelineStage) -> Result<Option<Proposal>> {
    sqlx::query_as::<_, ProposalRow>(
        "UPDATE proposals SET stage = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(stage.as_str())
    .fetch_optional(pool)
    .await?
    .map(Proposal::try_from)
    .transpose()
}
