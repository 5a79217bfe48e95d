//! Input checks shared by forms and table cells
//!
//! Small predicates and text helpers used by the form validator, the
//! notification layer and page templates.

use regex::Regex;
use std::sync::LazyLock;

/// `local@domain.tld` with no whitespace and exactly the separators the
/// server-side forms accept
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Default cut-off for [`truncate`]
pub const DEFAULT_TRUNCATE_LEN: usize = 50;

/// True for missing or empty text
pub fn is_empty(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// True when the value is empty after trimming whitespace.
///
/// This is the required-field rule.
///
/// # Examples
///
/// ```
/// use invent_ui::validators::is_blank;
///
/// assert!(is_blank("   "));
/// assert!(!is_blank(" 12 "));
/// ```
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks the basic `name@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Keeps the first `max_chars` characters and appends `...` when the text was longer.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
