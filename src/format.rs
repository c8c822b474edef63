//! Human-readable date formatting for record timestamps.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Format an RFC 3339 timestamp as e.g. `March 5, 2024` (UTC).
///
/// With `include_time`, appends a 12-hour clock: `March 5, 2024, 2:07 PM`.
pub fn format_date(timestamp: &str, include_time: bool) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp.trim())
        .with_context(|| format!("invalid timestamp '{timestamp}'"))?;
    Ok(format_datetime(&parsed.with_timezone(&Utc), include_time))
}

pub fn format_datetime(ts: &DateTime<Utc>, include_time: bool) -> String {
    if include_time {
        ts.format("%B %-d, %Y, %-I:%M %p").to_string()
    } else {
        ts.format("%B %-d, %Y").to_string()
    }
}
