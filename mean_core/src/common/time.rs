use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::mean_exception::{ErrCode, MeanError};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a unix timestamp in whole seconds to a UTC instant
pub fn from_unix_seconds(secs: i64) -> Result<DateTime<Utc>, MeanError> {
    Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
        MeanError::new(
            format!("unix timestamp {} is out of range", secs),
            ErrCode::TimestampError,
        )
    })
}

/// Parse an event timestamp.
///
/// Supports multiple formats: unix seconds ("1672531200"),
/// "YYYY-MM-DD HH:MM:SS" (read as UTC) or RFC 3339.
pub fn parse_timestamp(time_str: &str) -> Result<DateTime<Utc>, MeanError> {
    let s = time_str.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return from_unix_seconds(secs);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, DATETIME_FORMAT) {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            MeanError::new(
                format!("cannot parse timestamp {:?}: {}", time_str, e),
                ErrCode::TimestampError,
            )
        })
}

pub fn to_str(ts: &DateTime<Utc>) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}
