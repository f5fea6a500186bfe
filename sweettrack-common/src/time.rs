//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's date in the bakery's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an RFC 3339 timestamp as stored in the database
pub fn parse_timestamp(raw: &str) -> crate::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| crate::Error::Internal(format!("Invalid timestamp '{}': {}", raw, e)))
}
