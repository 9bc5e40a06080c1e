//! Time related utils.

use chrono::TimeZone;
use chrono::Utc;

use crate::Error;
use crate::Result;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime with current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Milliseconds since the unix epoch, the unit the open platform expects
/// in `timestamp`.
pub fn format_timestamp_millis(t: DateTime) -> String {
    t.timestamp_millis().to_string()
}

/// Build a DateTime from milliseconds since the unix epoch.
pub fn from_timestamp_millis(ms: i64) -> Result<DateTime> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| Error::unexpected(format!("timestamp {ms} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_millis() -> Result<()> {
        let t = from_timestamp_millis(1537324254708)?;
        assert_eq!(format_timestamp_millis(t), "1537324254708");
        assert_eq!(t.to_rfc3339(), "2018-09-19T02:30:54.708+00:00");
        Ok(())
    }
}
