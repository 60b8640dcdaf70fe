use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::timeline::{describe_phase, ProjectSchedule};

/// An all-day calendar entry. `end` is exclusive, as in iCalendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One event per scheduled phase, titled `<proposal title>: <phase name>`.
///
/// UIDs are derived from the proposal id and phase position, so re-exporting an
/// unchanged schedule yields the same UIDs and calendar clients update in place.
pub fn events_from_schedule(
    proposal_id: Uuid,
    proposal_title: &str,
    schedule: &ProjectSchedule,
) -> Vec<CalendarEvent> {
    schedule
        .phases
        .iter()
        .enumerate()
        .map(|(idx, phase)| {
            let start = phase.start_date.date_naive();
            // Zero-week phases (handed straight to `schedule`) still need a one-day event.
            let end = phase.end_date.date_naive().max(start.succ_opt().unwrap_or(start));
            CalendarEvent {
                uid: format!("{proposal_id}-phase-{}@rfp-api", idx + 1),
                title: format!("{proposal_title}: {}", phase.name),
                description: describe_phase(phase),
                start,
                end,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{compute_project_schedule, parse_instant, schedule, PhaseSpec};

    #[test]
    fn test_one_event_per_phase_with_dates() {
        let id = Uuid::new_v4();
        let schedule = compute_project_schedule(
            parse_instant("2025-01-01T00:00:00.000Z").unwrap(),
            "Phase 1: A (2 weeks) Phase 2: B (3 weeks)",
        );
        let events = events_from_schedule(id, "Transit RFP", &schedule);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Transit RFP: A");
        assert_eq!(events[0].start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(events[0].end, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(events[1].start, events[0].end);
        assert_eq!(events[1].end, NaiveDate::from_ymd_opt(2025, 2, 5).unwrap());
        assert_eq!(events[1].uid, format!("{id}-phase-2@rfp-api"));
        assert!(events[1].description.starts_with("B — 3 weeks"));
    }

    #[test]
    fn test_uids_are_stable_across_exports() {
        let id = Uuid::new_v4();
        let schedule = compute_project_schedule(
            parse_instant("2025-04-01").unwrap(),
            "Phase 1: Build (6 weeks)",
        );
        assert_eq!(
            events_from_schedule(id, "X", &schedule),
            events_from_schedule(id, "X", &schedule)
        );
    }

    #[test]
    fn test_zero_week_phase_becomes_one_day_event() {
        let kickoff = PhaseSpec {
            name: "Kickoff".to_string(),
            duration_weeks: 0,
        };
        let sched = schedule(parse_instant("2025-03-03").unwrap(), &[kickoff]);
        let events = events_from_schedule(Uuid::new_v4(), "X", &sched);

        assert_eq!(events[0].start, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(events[0].end, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    }
}
