//! Header extraction from loosely structured email text, and date parsing.
//!
//! Files in the corpus are plain text with RFC 5322-ish headers, but nothing
//! guarantees a clean header block. Extraction therefore works line by line
//! on the whole content instead of parsing a header section.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Return the value of the first line starting with `prefix`.
///
/// Every line is trimmed before matching, and the remainder after the prefix
/// is trimmed again. Matching is case-sensitive and purely prefix based, so a
/// body line such as `"Subject: see below"` matches just like a header would.
/// Returns an empty string when no line matches.
pub fn extract_header(content: &str, prefix: &str) -> String {
    find_header(content, prefix)
        .map(|value| value.to_string())
        .unwrap_or_default()
}

/// Whether any trimmed line of `content` starts with `prefix`.
pub fn has_header(content: &str, prefix: &str) -> bool {
    find_header(content, prefix).is_some()
}

fn find_header<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    content
        .split('\n')
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix))
        .map(str::trim)
}

/// Decode raw file bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every byte).
pub fn decode_text(bytes: &[u8]) -> String {
    // Strip BOM if present
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

// ── Dates ───────────────────────────────────────────────────────

/// A date layout accepted in `Date:` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Mon, 02 Jan 2006 15:04:05 -0700`
    Rfc1123Z,
    /// `02 Jan 06 15:04 MST`
    Rfc822,
    /// `Monday, 02-Jan-06 15:04:05 MST`
    Rfc850,
    /// `Mon, 2 Jan 2006 15:04:05 -0700`
    WeekdayDayMonthYear,
    /// `2 Jan 2006 15:04:05 -0700`
    DayMonthYear,
}

/// Layouts in the order they are tried. The first one that parses wins.
pub const DATE_FORMATS: [DateFormat; 5] = [
    DateFormat::Rfc1123Z,
    DateFormat::Rfc822,
    DateFormat::Rfc850,
    DateFormat::WeekdayDayMonthYear,
    DateFormat::DayMonthYear,
];

impl DateFormat {
    /// Parse `value` as this layout. The whole value must match.
    ///
    /// A leading weekday must be a valid name but is not checked against
    /// the date.
    pub fn parse(self, value: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Rfc1123Z => {
                let rest = strip_weekday(value, &SHORT_WEEKDAYS)?;
                DateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S %z").ok()
            }
            Self::Rfc822 => parse_with_zone_name(value, "%d %b %y %H:%M"),
            Self::Rfc850 => {
                let rest = strip_weekday(value, &LONG_WEEKDAYS)?;
                parse_with_zone_name(rest, "%d-%b-%y %H:%M:%S")
            }
            Self::WeekdayDayMonthYear => {
                let rest = strip_weekday(value, &SHORT_WEEKDAYS)?;
                DateTime::parse_from_str(rest, "%e %b %Y %H:%M:%S %z").ok()
            }
            Self::DayMonthYear => DateTime::parse_from_str(value, "%e %b %Y %H:%M:%S %z").ok(),
        }
    }
}

const SHORT_WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const LONG_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Drop a leading `"<weekday>, "` whose name is one of `names`.
fn strip_weekday<'a>(value: &'a str, names: &[&str]) -> Option<&'a str> {
    let (day, rest) = value.split_once(", ")?;
    names
        .iter()
        .any(|name| name.eq_ignore_ascii_case(day))
        .then_some(rest)
}

/// Try every layout of [`DATE_FORMATS`] in order.
///
/// Returns the winning layout and the parsed timestamp with its original
/// offset, or `None` when nothing matches. Unlike the bare layouts, a
/// trailing comment such as `(PDT)` is accepted and ignored.
pub fn match_date(value: &str) -> Option<(DateFormat, DateTime<FixedOffset>)> {
    let value = strip_trailing_comment(value.trim());
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|&format| format.parse(value).map(|dt| (format, dt)))
}

/// Parse a `Date:` header value, normalized to UTC.
///
/// `None` means no layout matched; callers decide what that defaults to.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    match match_date(value) {
        Some((_, dt)) => Some(dt.with_timezone(&Utc)),
        None => {
            if !value.trim().is_empty() {
                debug!(date = value, "Unrecognized date format");
            }
            None
        }
    }
}

/// Drop a trailing `(...)` comment: `"... -0700 (PDT)"` → `"... -0700"`.
fn strip_trailing_comment(s: &str) -> &str {
    if s.ends_with(')') {
        if let Some(open) = s.rfind('(') {
            return s[..open].trim_end();
        }
    }
    s
}

/// Parse layouts that end in a zone abbreviation such as `MST`.
fn parse_with_zone_name(value: &str, layout: &str) -> Option<DateTime<FixedOffset>> {
    let (rest, zone) = value.rsplit_once(' ')?;
    let offset = FixedOffset::east_opt(zone_offset_seconds(zone)?)?;
    let naive = NaiveDateTime::parse_from_str(rest.trim_end(), layout).ok()?;
    offset.from_local_datetime(&naive).single()
}

/// Offset of a zone abbreviation in seconds east of UTC.
///
/// Unknown but well-formed abbreviations are taken as UTC.
fn zone_offset_seconds(zone: &str) -> Option<i32> {
    if !(2..=5).contains(&zone.len()) || !zone.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let hours = match zone {
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => 0,
    };
    Some(hours * 3600)
}
