//! Text and work-code canonicalisation.

use crate::types::WorkCode;

/// Number of digits in a catalog work code.
const WORK_CODE_DIGITS: usize = 8;

/// Canonicalise free text for comparison.
///
/// Trims, lowercases, and collapses every whitespace run (including the
/// ideographic space used in Japanese titles) to a single ASCII space.
///
/// ```
/// use musicdb_lookup::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  Sample\t\u{3000}SONG "), "sample song");
/// ```
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Reduce raw catalog text to a canonical [`WorkCode`].
///
/// Every non-digit character is dropped; exactly eight remaining digits
/// are formatted as `ddd-dddd-d`. Anything else yields `None`.
///
/// ```
/// use musicdb_lookup::normalize::normalize_work_code;
///
/// let code = normalize_work_code("作品コード: 123-4567-8").unwrap();
/// assert_eq!(code.as_str(), "123-4567-8");
/// assert!(normalize_work_code("123-4567").is_none());
/// ```
pub fn normalize_work_code(raw: &str) -> Option<WorkCode> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != WORK_CODE_DIGITS {
        return None;
    }
    let formatted = format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]);
    formatted.parse().ok()
}
