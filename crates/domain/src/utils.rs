//! Small parsing helpers for catalog payloads

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::CATALOG_TIMESTAMP_FORMAT;
use crate::errors::{Result, TuneWireError};

/// Parse a catalog timestamp such as `2017-06-01T18:04:21Z`.
///
/// # Errors
/// Returns `TuneWireError::InvalidInput` if the value does not match
/// [`CATALOG_TIMESTAMP_FORMAT`].
pub fn parse_catalog_timestamp(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, CATALOG_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| TuneWireError::InvalidInput(format!("invalid timestamp '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_catalog_timestamp() {
        let parsed = parse_catalog_timestamp("2017-06-01T18:04:21Z").unwrap();
        assert_eq!(parsed.year(), 2017);
        assert_eq!(parsed.month(), 6);
        assert_eq!(parsed.day(), 1);
        assert_eq!(parsed.hour(), 18);
        assert_eq!(parsed.second(), 21);
    }

    #[test]
    fn rejects_other_formats() {
        let err = parse_catalog_timestamp("2017-06-01").unwrap_err();
        assert!(matches!(err, TuneWireError::InvalidInput(_)));
    }
}
