//! Minimal RFC 5545 writer for all-day events.

use chrono::{DateTime, Utc};

use crate::calendar::events::CalendarEvent;

const CRLF: &str = "\r\n";
/// Content lines longer than this many octets are folded.
const MAX_LINE_OCTETS: usize = 75;

/// Renders a VCALENDAR containing `events`. `stamp` becomes every event's DTSTAMP.
pub fn render_ics(events: &[CalendarEvent], stamp: DateTime<Utc>) -> String {
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//rfp-api//Proposal Timeline//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", escape_text(&event.uid)));
        lines.push(format!("DTSTAMP:{dtstamp}"));
        lines.push(format!("DTSTART;VALUE=DATE:{}", event.start.format("%Y%m%d")));
        lines.push(format!("DTEND;VALUE=DATE:{}", event.end.format("%Y%m%d")));
        lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
        if !event.description.is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
        }
        lines.push("TRANSP:TRANSPARENT".to_string());
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str(CRLF);
    }
    out
}

/// Escapes backslash, semicolon, comma and newlines in a TEXT value.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Splits a content line into 75-octet chunks joined by CRLF + space,
/// never breaking inside a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut octets = 0;
    // continuation lines start with a space, which counts toward their limit
    for c in line.chars() {
        let width = c.len_utf8();
        if octets + width > MAX_LINE_OCTETS {
            out.push_str(CRLF);
            out.push(' ');
            octets = 1;
        }
        out.push(c);
        octets += width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn event(title: &str, description: &str) -> CalendarEvent {
        CalendarEvent {
            uid: "abc-phase-1@rfp-api".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_render_ics_structure() {
        let ics = render_ics(&[event("Discovery", "")], stamp());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("DTSTAMP:20250102T030405Z\r\n"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20250101\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20250115\r\n"));
        assert!(ics.contains("SUMMARY:Discovery\r\n"));
        assert!(!ics.contains("DESCRIPTION"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    }

    #[test]
    fn test_render_ics_empty_calendar() {
        let ics = render_ics(&[], stamp());
        assert!(!ics.contains("VEVENT"));
        assert!(ics.contains("PRODID:"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(
            escape_text("Design, Build; Test\\Ship\nDone"),
            "Design\\, Build\\; Test\\\\Ship\\nDone"
        );
    }

    #[test]
    fn test_fold_line_respects_octet_limit() {
        let line = format!("DESCRIPTION:{}", "é".repeat(80));
        let folded = fold_line(&line);

        for (i, part) in folded.split("\r\n").enumerate() {
            assert!(part.len() <= MAX_LINE_OCTETS, "segment {i} too long");
            if i > 0 {
                assert!(part.starts_with(' '));
            }
        }
        let unfolded = folded.replace("\r\n ", "");
        assert_eq!(unfolded, line);
    }

    #[test]
    fn test_short_lines_are_not_folded() {
        assert_eq!(fold_line("SUMMARY:Short"), "SUMMARY:Short");
    }
}
