//! Phase Segmenter — splits timeline text into ordered `PhaseSpec`s.

use once_cell::sync::Lazy;
use regex::{Match, Regex};

use crate::timeline::duration::{extract_total_weeks, WEEK_ANNOTATION};
use crate::timeline::models::{PhaseSpec, Segmentation};

/// Weeks assigned to a single phase whose own duration cannot be parsed.
/// Deliberately distinct from `DEFAULT_TOTAL_WEEKS`.
pub const DEFAULT_PHASE_WEEKS: u32 = 2;

/// Name of the single phase substituted when no phase markers are found.
pub const FALLBACK_PHASE_NAME: &str = "Project Execution";

/// `Phase <n>:` marker. The text up to the next marker is that phase's body.
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bphase\s*[0-9]+\s*:").expect("marker pattern is valid"));

/// `<name> (<annotation>)` at the start of a body. The name is lazy so it ends at
/// the parenthesis that opens the first week annotation, and never crosses a line break.
static BODY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\A[^\S\n]*([^\n]*?)[^\S\n]*{WEEK_ANNOTATION}"
    ))
    .expect("phase body pattern is valid")
});

/// Segments `text` into phases in order of appearance.
///
/// Phase numbers in the text are ignored. With no recognizable markers, returns a
/// single `FALLBACK_PHASE_NAME` phase spanning `extract_total_weeks(text)`.
pub fn segment_phases(text: &str) -> Segmentation {
    let markers: Vec<_> = MARKER_RE.find_iter(text).collect();

    let phases: Vec<PhaseSpec> = markers
        .iter()
        .enumerate()
        .filter_map(|(i, marker)| {
            let body_end = markers.get(i + 1).map_or(text.len(), |next| next.start());
            BODY_RE.captures(&text[marker.end()..body_end])
        })
        .enumerate()
        .map(|(idx, caps)| {
            let name = caps.get(1).map(|m| clean_name(m.as_str())).unwrap_or("");
            let name = if name.is_empty() {
                format!("Phase {}", idx + 1)
            } else {
                name.to_string()
            };

            let duration_weeks = positive_weeks(caps.get(3))
                .or_else(|| positive_weeks(caps.get(2)))
                .unwrap_or(DEFAULT_PHASE_WEEKS);

            PhaseSpec {
                name,
                duration_weeks,
            }
        })
        .collect();

    if phases.is_empty() {
        return Segmentation {
            phases: vec![PhaseSpec {
                name: FALLBACK_PHASE_NAME.to_string(),
                duration_weeks: extract_total_weeks(text),
            }],
            used_fallback: true,
        };
    }

    Segmentation {
        phases,
        used_fallback: false,
    }
}

fn positive_weeks(m: Option<Match<'_>>) -> Option<u32> {
    m.and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|weeks| *weeks > 0)
}

/// Strips surrounding whitespace and any trailing commas.
fn clean_name(raw: &str) -> &str {
    raw.trim()
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}
