//! Date helpers shared by the CLI, the fetch adapter and the screens.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

/// Parse a `MMDD` override into a date relative to `today`.
///
/// A month and day still ahead of (or equal to) today's fall in `today`'s
/// year, earlier ones in the following year.
pub fn parse_mmdd(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.len() != 4 || !input.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("expected a date in MMDD form, got '{}'", input);
    }
    let month: u32 = input[..2].parse().context("invalid month")?;
    let day: u32 = input[2..].parse().context("invalid day")?;

    let year = if (month, day) < (today.month(), today.day()) {
        today.year() + 1
    } else {
        today.year()
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("'{}' is not a valid date in {}", input, year))
}

/// `YYYYMMDD`, the form the scoreboard endpoint expects in `dates=`.
pub fn api_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Short `DD/MM` label used in log lines.
pub fn short_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// Parse an API timestamp. ESPN omits seconds (`2026-10-18T18:45Z`), so plain
/// RFC 3339 is only the first attempt.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<chrono::Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&chrono::Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Kickoff time and date (`HH:MM`, `DD/MM`) in the given timezone.
pub fn format_kickoff<Tz: TimeZone>(kickoff: DateTime<chrono::Utc>, tz: &Tz) -> (String, String)
where
    Tz::Offset: std::fmt::Display,
{
    let local = kickoff.with_timezone(tz);
    (
        local.format("%H:%M").to_string(),
        local.format("%d/%m").to_string(),
    )
}
