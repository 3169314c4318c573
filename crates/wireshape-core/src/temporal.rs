//! # Temporal Types: ISO 8601 Date Strings
//!
//! Dates travel over the wire as ISO 8601 strings and are held in memory
//! as `DateTime<Utc>`. This module owns both directions.
//!
//! ## Accepted Forms
//!
//! Calendar dates in extended format, optionally followed by a time and a
//! zone designator:
//!
//! ```text
//! 2026-01-15
//! 2026-01
//! 2026
//! 2026-01-15T12:30
//! 2026-01-15T12:30:45.123Z
//! 2026-01-15 12:30:45+05:30
//! ```
//!
//! A string without a zone designator is read as UTC. `24:00` (with zero
//! seconds and fraction) is midnight at the end of the day. Fractions
//! finer than nanoseconds are truncated. Week dates,
//! ordinal dates and the basic (separator-free) format are rejected.
//!
//! ## Output Form
//!
//! [`format_iso8601()`] always renders UTC with millisecond precision and
//! a `Z` suffix: `YYYY-MM-DDTHH:MM:SS.sssZ`.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

use crate::error::WireshapeError;

const ISO_8601_PATTERN: &str = concat!(
    r"^([+-]?\d{4})",
    r"(?:-(\d{2})",
    r"(?:-(\d{2})",
    r"(?:[Tt ](\d{2}):(\d{2})(?::(\d{2})(?:[.,](\d+))?)?",
    r"([Zz]|[+-]\d{2}(?::?\d{2})?)?",
    r")?)?)?$",
);

fn iso_8601() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ISO_8601_PATTERN).expect("ISO 8601 pattern is a valid regex"))
}

/// Parse an ISO 8601 date string into a UTC instant.
///
/// # Errors
///
/// Returns [`WireshapeError::InvalidDate`] if the string does not have one
/// of the accepted shapes or names a calendar date, time or offset that
/// does not exist (e.g. `2026-02-30`, `25:00`, `+24:00`).
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, WireshapeError> {
    let invalid = |reason: &str| WireshapeError::InvalidDate(format!("{s:?}: {reason}"));

    let caps = iso_8601()
        .captures(s)
        .ok_or_else(|| invalid("not an ISO 8601 calendar date"))?;

    let number = |i: usize, default: u32| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(default)
    };

    let year: i32 = caps[1].parse().map_err(|_| invalid("year out of range"))?;
    let date = NaiveDate::from_ymd_opt(year, number(2, 1), number(3, 1))
        .ok_or_else(|| invalid("no such calendar date"))?;

    let nanos = match caps.get(7) {
        Some(fraction) => {
            let digits = fraction.as_str().get(..9).unwrap_or(fraction.as_str());
            let padded = format!("{digits:0<9}");
            padded.parse::<u32>().map_err(|_| invalid("bad fraction"))?
        }
        None => 0,
    };
    let (hour, minute, second) = (number(4, 0), number(5, 0), number(6, 0));
    let (date, time) = if hour == 24 && minute == 0 && second == 0 && nanos == 0 {
        let next = date
            .succ_opt()
            .ok_or_else(|| invalid("year out of range"))?;
        let midnight = NaiveTime::from_hms_opt(0, 0, 0)
            .ok_or_else(|| invalid("no such time of day"))?;
        (next, midnight)
    } else {
        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
            .ok_or_else(|| invalid("no such time of day"))?;
        (date, time)
    };

    let offset = match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") | Some("z") => FixedOffset::east_opt(0),
        Some(designator) => parse_offset(designator),
    }
    .ok_or_else(|| invalid("no such UTC offset"))?;

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| invalid("ambiguous local time"))
}

/// Parse `+HH`, `+HHMM` or `+HH:MM` (and the `-` forms).
fn parse_offset(designator: &str) -> Option<FixedOffset> {
    let sign = if designator.starts_with('-') { -1 } else { 1 };
    let digits: String = designator[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Render a UTC instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
