use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use thiserror::Error;

/// Absolute formats tried in order. Abbreviated forms come first so that
/// "Mar. 5, 2024" never reaches the full-month patterns.
const ABSOLUTE_FORMATS: &[&str] = &[
    "%b. %d, %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

#[allow(clippy::expect_used)]
static RELATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s+(minute|hour|day)s?\s+ago$").expect("relative date regex is valid")
});

// Four-letter month abbreviations the listing emits; chrono only knows three-letter forms.
#[allow(clippy::expect_used)]
static IRREGULAR_ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsept\b").expect("abbreviation regex is valid"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized date format: {raw:?}")]
pub struct DateParseError {
    pub raw: String,
}

/// A listing date normalized to a comparable instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub instant: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DateParser;

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DateParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a listing date, either absolute ("Sept. 5, 2024") or relative
    /// ("3 hours ago", resolved against `reference_now`).
    ///
    /// Absolute dates resolve to midnight UTC of that day.
    pub fn parse(
        &self,
        raw: &str,
        reference_now: DateTime<Utc>,
    ) -> Result<ParsedDate, DateParseError> {
        let cleaned = normalize(raw);

        if let Some(date) = parse_absolute(&cleaned) {
            return Ok(ParsedDate {
                instant: date.and_time(NaiveTime::MIN).and_utc(),
            });
        }

        parse_relative(&cleaned, reference_now)
            .map(|instant| ParsedDate { instant })
            .ok_or_else(|| DateParseError {
                raw: raw.to_string(),
            })
    }
}

fn normalize(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    IRREGULAR_ABBREVIATION
        .replace_all(&collapsed, "Sep")
        .into_owned()
}

fn parse_absolute(text: &str) -> Option<NaiveDate> {
    ABSOLUTE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_relative(text: &str, reference_now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let captures = RELATIVE_PATTERN.captures(text)?;
    let amount: i64 = captures[1].parse().ok()?;
    if amount == 0 {
        return None;
    }

    let offset = match captures[2].to_ascii_lowercase().as_str() {
        "minute" => Duration::try_minutes(amount)?,
        "hour" => Duration::try_hours(amount)?,
        "day" => Duration::try_days(amount)?,
        _ => return None,
    };

    reference_now.checked_sub_signed(offset)
}
