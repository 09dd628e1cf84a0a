//! Numeric extraction from free-text spec values.
//!
//! Spec values look like `"8 GB"`, `"5,000mAh"` or `"6.67 in"`. The leading
//! magnitude is pulled out before any magnitude comparison.

use regex::Regex;
use std::sync::LazyLock;

/// A run of ASCII digits, optionally followed by one decimal part.
static MAGNITUDE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap());

/// Extract the first numeric magnitude embedded in a spec value.
///
/// Grouping commas are stripped first. A digit run glued to the end of a Latin
/// word (`X1`, `A17`) is a model designator, not a magnitude, and is skipped.
/// Returns `None` when the value is absent or holds no magnitude; callers must
/// treat that as "not comparable", never as zero.
///
/// # Examples
///
/// ```
/// use phone_compare::compare::extract_magnitude;
///
/// assert_eq!(extract_magnitude(Some("5,000 mAh")), Some(5000.0));
/// assert_eq!(extract_magnitude(Some("CPU X1")), None);
/// assert_eq!(extract_magnitude(None), None);
/// ```
pub fn extract_magnitude(value: Option<&str>) -> Option<f64> {
    let cleaned = value?.replace(',', "");
    MAGNITUDE
        .find_iter(&cleaned)
        .find(|m| {
            !cleaned[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphabetic())
        })
        .and_then(|m| m.as_str().parse().ok())
}
