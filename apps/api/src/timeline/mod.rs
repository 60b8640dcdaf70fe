//! Timeline engine — turns free-text project timelines into dated phases.
//!
//! Flow: segment_phases → schedule. Every change to a proposal's timeline text
//! recomputes the whole envelope through `compute_project_schedule`; nothing is
//! patched incrementally.

pub mod duration;
pub mod handlers;
pub mod instant;
pub mod models;
pub mod scheduler;
pub mod segmenter;

use chrono::{DateTime, Utc};

pub use duration::extract_total_weeks;
pub use instant::{parse_instant, TimelineError};
pub use models::{PhaseSpec, ProjectPhase, ProjectSchedule};
pub use scheduler::schedule;
pub use segmenter::segment_phases;

/// Segments `timeline_text` and schedules the phases from `generated_date`.
///
/// The envelope's `start_date` is `generated_date` unmodified, and there is always
/// at least one phase.
pub fn compute_project_schedule(
    generated_date: DateTime<Utc>,
    timeline_text: &str,
) -> ProjectSchedule {
    let segmentation = segment_phases(timeline_text);
    if segmentation.used_fallback {
        tracing::debug!(
            "No phase markers in timeline text; using a single {}-week phase",
            segmentation.phases[0].duration_weeks
        );
    }
    schedule(generated_date, &segmentation.phases)
}

/// One-line human summary, e.g. `Discovery — 2 weeks (Jan 1, 2025 to Jan 15, 2025)`.
pub fn describe_phase(phase: &ProjectPhase) -> String {
    let unit = if phase.duration_weeks == 1 {
        "week"
    } else {
        "weeks"
    };
    format!(
        "{} — {} {} ({} to {})",
        phase.name,
        phase.duration_weeks,
        unit,
        phase.start_date.format("%b %-d, %Y"),
        phase.end_date.format("%b %-d, %Y")
    )
}
