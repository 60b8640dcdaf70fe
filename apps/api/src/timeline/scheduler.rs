//! Date Scheduler — chains phase durations from a start instant.

use chrono::{DateTime, Days, Utc};
use tracing::warn;

use crate::timeline::models::{PhaseSpec, ProjectPhase, ProjectSchedule};

/// Assigns contiguous start/end dates to `phases`, beginning at `start`.
///
/// Durations are plain calendar days (`weeks * 7`) in UTC. An empty list yields a
/// degenerate envelope where `end_date == start_date`.
pub fn schedule(start: DateTime<Utc>, phases: &[PhaseSpec]) -> ProjectSchedule {
    let mut cursor = start;

    let phases: Vec<ProjectPhase> = phases
        .iter()
        .map(|spec| {
            let end = advance_weeks(cursor, spec.duration_weeks);
            let phase = ProjectPhase {
                name: spec.name.clone(),
                duration_weeks: spec.duration_weeks,
                start_date: cursor,
                end_date: end,
            };
            cursor = end;
            phase
        })
        .collect();

    let end_date = phases.last().map_or(start, |p| p.end_date);

    ProjectSchedule {
        start_date: start,
        end_date,
        phases,
    }
}

/// Adds `weeks * 7` calendar days, saturating at the latest representable instant.
pub fn advance_weeks(from: DateTime<Utc>, weeks: u32) -> DateTime<Utc> {
    let days = u64::from(weeks) * 7;
    from.checked_add_days(Days::new(days)).unwrap_or_else(|| {
        warn!("Advancing {from} by {weeks} weeks overflows the calendar; saturating");
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn spec(name: &str, weeks: u32) -> PhaseSpec {
        PhaseSpec {
            name: name.to_string(),
            duration_weeks: weeks,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_chains_phases_from_start() {
        let sched = schedule(ymd(2025, 1, 1), &[spec("A", 2), spec("B", 3)]);

        assert_eq!(sched.phases[0].start_date, ymd(2025, 1, 1));
        assert_eq!(sched.phases[0].end_date, ymd(2025, 1, 15));
        assert_eq!(sched.phases[1].start_date, ymd(2025, 1, 15));
        assert_eq!(sched.phases[1].end_date, ymd(2025, 2, 5));
        assert_eq!(sched.end_date, ymd(2025, 2, 5));
    }

    #[test]
    fn test_phases_are_contiguous() {
        let specs = [spec("A", 1), spec("B", 4), spec("C", 2), spec("D", 10)];
        let sched = schedule(ymd(2024, 12, 20), &specs);

        for pair in sched.phases.windows(2) {
            assert_eq!(pair[0].end_date, pair[1].start_date);
        }
        assert_eq!(sched.phases[0].start_date, sched.start_date);
        assert_eq!(sched.end_date, sched.phases.last().unwrap().end_date);
    }

    #[test]
    fn test_preserves_time_of_day_across_leap_day() {
        let start = Utc.with_ymd_and_hms(2024, 2, 20, 16, 45, 30).unwrap();
        let sched = schedule(start, &[spec("Sprint", 1)]);
        assert_eq!(
            sched.phases[0].end_date,
            Utc.with_ymd_and_hms(2024, 2, 27, 16, 45, 30).unwrap()
        );

        let sched = schedule(start, &[spec("Sprint", 2)]);
        assert_eq!(
            sched.phases[0].end_date,
            Utc.with_ymd_and_hms(2024, 3, 5, 16, 45, 30).unwrap()
        );
    }

    #[test]
    fn test_empty_phase_list_is_degenerate_range() {
        let start = ymd(2025, 7, 4);
        let sched = schedule(start, &[]);
        assert!(sched.phases.is_empty());
        assert_eq!(sched.start_date, start);
        assert_eq!(sched.end_date, start);
    }

    #[test]
    fn test_overflow_saturates_instead_of_panicking() {
        let sched = schedule(ymd(2025, 1, 1), &[spec("Forever", u32::MAX)]);
        assert_eq!(sched.end_date, DateTime::<Utc>::MAX_UTC);
    }
}
