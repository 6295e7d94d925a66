//! Work experience calculation
//!
//! Reduces an ordered employment history to whole years of experience.
//!
//! Global invariants enforced:
//! - Records are never reordered; index 0 is treated as the most recent
//! - The result is never negative, whatever order the source used

use crate::payload::EmploymentRecord;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Milliseconds in a 365.25-day year
const MS_PER_YEAR: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 365.25;

/// Compute years of experience from an employment history
///
/// `span = end_date(records[0]) - start_date(records[last])`, converted with a
/// 365.25-day year, rounded half-up and made absolute. An empty history is 0.
/// Missing or unparseable dates are an error; callers decide the fallback.
pub fn compute_experience_years(records: &[EmploymentRecord]) -> Result<u32> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Ok(0);
    };

    let end = parse_record_date(first.end_date.as_deref(), "end_date")?;
    let start = parse_record_date(last.start_date.as_deref(), "start_date")?;

    let years = (end - start).num_milliseconds() as f64 / MS_PER_YEAR;

    // floor(x + 0.5) rounds halves toward +inf before the sign is dropped
    Ok((years + 0.5).floor().abs() as u32)
}

fn parse_record_date(raw: Option<&str>, field: &str) -> Result<DateTime<Utc>> {
    let Some(raw) = raw else {
        bail!("employment record has no {}", field);
    };
    parse_date(raw).with_context(|| format!("invalid {}: {:?}", field, raw))
}

/// Parse an API date string as a UTC instant
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2021-03-04T10:00:00Z`, `2021-03-04T10:00:00+02:00`)
/// - naive timestamp (`2021-03-04T10:00:00`, fractional seconds allowed)
/// - calendar date (`2021-03-04`)
/// - year and month (`2021-03`, first of the month)
/// - year (`2021`, January 1st)
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"))
        .ok()
        .or_else(|| parse_year(s));

    match date.and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(ndt) => Ok(Utc.from_utc_datetime(&ndt)),
        None => bail!("unrecognized date format"),
    }
}

fn parse_year(s: &str) -> Option<NaiveDate> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)
}
