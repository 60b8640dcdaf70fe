//! Proposal records: a fixed core plus an explicit side-map of custom sections.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::timeline::instant::iso_millis;
use crate::timeline::{ProjectPhase, ProjectSchedule};

/// CRM pipeline position of a proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Won,
    Lost,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Draft => "draft",
            PipelineStage::Submitted => "submitted",
            PipelineStage::UnderReview => "under_review",
            PipelineStage::Won => "won",
            PipelineStage::Lost => "lost",
        }
    }

    /// Won and lost proposals are closed deals.
    pub fn is_closed(&self) -> bool {
        matches!(self, PipelineStage::Won | PipelineStage::Lost)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PipelineStage::Draft),
            "submitted" => Ok(PipelineStage::Submitted),
            "under_review" => Ok(PipelineStage::UnderReview),
            "won" => Ok(PipelineStage::Won),
            "lost" => Ok(PipelineStage::Lost),
            other => Err(anyhow!("unknown pipeline stage '{other}'")),
        }
    }
}

/// Section keys with a dedicated field on `ProposalContent`.
pub const CORE_SECTIONS: &[&str] = &[
    "executive_summary",
    "technical_approach",
    "timeline",
    "pricing",
    "team",
];

/// The editable body of a proposal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalContent {
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub technical_approach: String,
    /// Free-text timeline; the source of the proposal's schedule.
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub pricing: String,
    #[serde(default)]
    pub team: String,
    /// Playbook-driven custom sections keyed by section name.
    #[serde(default)]
    pub additional_sections: BTreeMap<String, String>,
}

impl ProposalContent {
    /// Returns the text of a core or custom section.
    pub fn section(&self, key: &str) -> Option<&str> {
        match key {
            "executive_summary" => Some(self.executive_summary.as_str()),
            "technical_approach" => Some(self.technical_approach.as_str()),
            "timeline" => Some(self.timeline.as_str()),
            "pricing" => Some(self.pricing.as_str()),
            "team" => Some(self.team.as_str()),
            other => self.additional_sections.get(other).map(String::as_str),
        }
    }
}

/// A proposal as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct Proposal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub client_name: String,
    pub rfp_text: String,
    pub content: ProposalContent,
    /// Same wire form as `schedule.startDate`.
    #[serde(with = "iso_millis")]
    pub generated_date: DateTime<Utc>,
    pub schedule: ProjectSchedule,
    pub stage: PipelineStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProposalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub client_name: String,
    pub rfp_text: String,
    pub executive_summary: String,
    pub technical_approach: String,
    pub timeline: String,
    pub pricing: String,
    pub team: String,
    pub additional_sections: Json<BTreeMap<String, String>>,
    pub generated_date: DateTime<Utc>,
    pub project_start: DateTime<Utc>,
    pub project_end: DateTime<Utc>,
    pub phases: Json<Vec<ProjectPhase>>,
    pub stage: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProposalRow> for Proposal {
    type Error = anyhow::Error;

    fn try_from(row: ProposalRow) -> Result<Self, Self::Error> {
        Ok(Proposal {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            client_name: row.client_name,
            rfp_text: row.rfp_text,
            content: ProposalContent {
                executive_summary: row.executive_summary,
                technical_approach: row.technical_approach,
                timeline: row.timeline,
                pricing: row.pricing,
                team: row.team,
                additional_sections: row.additional_sections.0,
            },
            generated_date: row.generated_date,
            schedule: ProjectSchedule {
                start_date: row.project_start,
                end_date: row.project_end,
                phases: row.phases.0,
            },
            stage: row.stage.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Request body for creating a proposal from generated content.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProposal {
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub rfp_text: String,
    #[serde(flatten)]
    pub content: ProposalContent,
    /// ISO-8601 instant the proposal was generated; defaults to now.
    pub generated_date: Option<String>,
}

/// A partial update to a proposal. `None` leaves a field as-is.
///
/// `additional_sections` is merged key by key; an empty value removes that section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProposalEdit {
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub executive_summary: Option<String>,
    pub technical_approach: Option<String>,
    pub timeline: Option<String>,
    pub pricing: Option<String>,
    pub team: Option<String>,
    #[serde(default)]
    pub additional_sections: BTreeMap<String, String>,
}

impl ProposalEdit {
    /// Builds an edit from section-keyed updates, routing unknown keys to custom sections.
    pub fn from_section_updates(updates: BTreeMap<String, String>) -> Self {
        let mut edit = ProposalEdit::default();
        for (key, value) in updates {
            if let Some(slot) = edit.core_section_mut(&key) {
                *slot = Some(value);
            } else {
                edit.additional_sections.insert(key, value);
            }
        }
        edit
    }

    fn core_section_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "executive_summary" => Some(&mut self.executive_summary),
            "technical_approach" => Some(&mut self.technical_approach),
            "timeline" => Some(&mut self.timeline),
            "pricing" => Some(&mut self.pricing),
            "team" => Some(&mut self.team),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ProposalEdit::default()
    }
}
