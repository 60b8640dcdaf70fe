//! Duration Extractor — totals every `(N weeks)` / `(N-M weeks)` annotation in a timeline.

use once_cell::sync::Lazy;
use regex::Regex;

/// Weeks assumed for a whole timeline that carries no usable annotations.
pub const DEFAULT_TOTAL_WEEKS: u32 = 4;

/// Parenthesized week annotation. Group 1 is the low bound, group 2 the optional high bound.
/// Accepts a hyphen or en dash between bounds.
pub(crate) const WEEK_ANNOTATION: &str = r"\(\s*([0-9]+)(?:\s*[-–]\s*([0-9]+))?\s*weeks?\s*\)";

static WEEK_ANNOTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?i){WEEK_ANNOTATION}")).expect("week annotation pattern is valid")
});

/// Sums the weeks of every annotation found anywhere in `text`.
///
/// Each annotation contributes its high bound when present, else its low bound.
/// Returns `DEFAULT_TOTAL_WEEKS` for empty text, text without annotations, or a zero total.
pub fn extract_total_weeks(text: &str) -> u32 {
    if text.trim().is_empty() {
        return DEFAULT_TOTAL_WEEKS;
    }

    let total = WEEK_ANNOTATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            caps.get(2)
                .or_else(|| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .fold(0u32, |acc, weeks| acc.saturating_add(weeks));

    if total == 0 {
        DEFAULT_TOTAL_WEEKS
    } else {
        total
    }
}
