use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timeline::instant::iso_millis;

/// A phase as segmented from timeline text, before any dates are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSpec {
    pub name: String,
    pub duration_weeks: u32,
}

/// A scheduled phase. `end_date` is always `start_date + duration_weeks * 7` days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhase {
    pub name: String,
    pub duration_weeks: u32,
    #[serde(with = "iso_millis")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_date: DateTime<Utc>,
}

/// The envelope computed for one timeline text.
///
/// Phases are contiguous: each phase starts exactly where the previous one ends.
/// `end_date` equals the last phase's end, or `start_date` when there are no phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSchedule {
    #[serde(with = "iso_millis")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_date: DateTime<Utc>,
    pub phases: Vec<ProjectPhase>,
}

/// Output of phase segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub phases: Vec<PhaseSpec>,
    /// True when no phase markers were found and a synthetic phase was substituted.
    pub used_fallback: bool,
}
