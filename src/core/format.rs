//! Display formatting for money, counts and timestamps
//!
//! Output follows the en-US conventions the server-rendered pages use:
//! comma thousands separators, `$` prefix, `Jan 5, 2024, 03:07 PM` dates.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Inserts a comma every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats an amount as US dollars with two decimals.
///
/// Missing and non-finite amounts render as `$0.00`.
///
/// ```
/// use invent_ui::core::format::format_currency;
///
/// assert_eq!(format_currency(Some(1234.5)), "$1,234.50");
/// assert_eq!(format_currency(None), "$0.00");
/// ```
pub fn format_currency(amount: Option<f64>) -> String {
    let amount = amount.filter(|a| a.is_finite()).unwrap_or(0.0);
    let (whole, cents) = split_fraction(amount.abs(), 100.0);
    let sign = if amount < 0.0 && (whole > 0.0 || cents > 0) { "-" } else { "" };
    format!(
        "{sign}${}.{cents:02}",
        group_thousands(&format!("{whole:.0}"))
    )
}

/// Formats a number with thousands separators and at most three decimals.
///
/// Trailing zeros in the fraction are dropped; missing input renders `"0"`.
pub fn format_number(number: Option<f64>) -> String {
    let number = number.filter(|n| n.is_finite()).unwrap_or(0.0);
    let (whole, fraction) = split_fraction(number.abs(), 1000.0);

    let mut out = String::new();
    if number < 0.0 && (whole > 0.0 || fraction > 0) {
        out.push('-');
    }
    out.push_str(&group_thousands(&format!("{whole:.0}")));
    if fraction > 0 {
        let digits = format!("{fraction:03}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Splits a non-negative value into its integer part and its fraction
/// rounded to `1 / scale`, carrying into the integer part on overflow.
fn split_fraction(value: f64, scale: f64) -> (f64, u64) {
    let mut whole = value.trunc();
    let mut fraction = ((value - whole) * scale).round();
    if fraction >= scale {
        whole += 1.0;
        fraction = 0.0;
    }
    (whole, fraction as u64)
}

enum ParsedDate {
    /// Carries its own offset (or is a date-only value, which is UTC midnight)
    Instant(DateTime<Utc>),
    /// Wall-clock time with no zone; interpreted in the rendering zone
    Wall(NaiveDateTime),
}

fn parse_date(input: &str) -> Option<ParsedDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(ParsedDate::Instant(dt.with_timezone(&Utc)));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(ParsedDate::Wall(naive));
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| ParsedDate::Instant(naive.and_utc()))
}

/// Formats a date string in the host's local time zone.
///
/// See [`format_date_in`].
pub fn format_date(input: &str, include_time: bool) -> String {
    format_date_in(input, include_time, &Local)
}

/// Formats a date string as `Jan 5, 2024` or `Jan 5, 2024, 03:07 PM`.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM[:SS]` values (read as
/// wall-clock time in `tz`) and bare `YYYY-MM-DD` dates (UTC midnight).
/// Empty or unparseable input yields an empty string.
pub fn format_date_in<Tz: TimeZone>(input: &str, include_time: bool, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }

    let local = match parse_date(input) {
        Some(ParsedDate::Instant(utc)) => utc.with_timezone(tz),
        Some(ParsedDate::Wall(naive)) => match tz.from_local_datetime(&naive).earliest() {
            Some(dt) => dt,
            None => {
                tracing::warn!("Date {} does not exist in the local time zone", input);
                return String::new();
            }
        },
        None => {
            tracing::warn!("Unparseable date: {}", input);
            return String::new();
        }
    };

    let pattern = if include_time {
        "%b %-d, %Y, %I:%M %p"
    } else {
        "%b %-d, %Y"
    };
    local.format(pattern).to_string()
}
