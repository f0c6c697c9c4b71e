//! Timestamp parsing and the date/time labels shown in the view.
//!
//! Exports write ISO-8601 local times (`2024-01-01T10:00:00`), sometimes with a
//! trailing `Z` or an explicit offset. Anything unparsable degrades to `None`
//! and renders through the sentinels below instead of failing the load.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date label for messages whose timestamp could not be parsed
pub const UNKNOWN_DATE: &str = "unknown date";

/// Time label for messages whose timestamp could not be parsed
pub const UNKNOWN_TIME: &str = "00:00";

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M";

/// Naive formats tried after the `T`/`Z` normalisation
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse an export timestamp into a naive local date-time.
///
/// Offsets are dropped (the wall-clock time is kept), matching how the export
/// itself presents times to the reader.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    let normalised = trimmed.trim_end_matches('Z').replacen('T', " ", 1);
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalised, format) {
            return Some(dt);
        }
    }

    // Date-only exports: midnight
    NaiveDate::parse_from_str(&normalised, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `dd.mm.yyyy`, or [`UNKNOWN_DATE`]
pub fn date_label(timestamp: Option<&NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => ts.format(DATE_FORMAT).to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// `HH:MM`, or [`UNKNOWN_TIME`]
pub fn time_label(timestamp: Option<&NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => ts.format(TIME_FORMAT).to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_export_format() {
        let ts = parse_timestamp("2024-01-01T10:00:00").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.hour(), 10);
        assert_eq!(time_label(Some(&ts)), "10:00");
        assert_eq!(date_label(Some(&ts)), "01.01.2024");
    }

    #[test]
    fn test_parse_variants() {
        assert!(parse_timestamp("2024-03-05T23:59:59Z").is_some());
        assert!(parse_timestamp("2024-03-05 23:59").is_some());
        assert!(parse_timestamp("2024-03-05T23:59:59.250").is_some());
        assert!(parse_timestamp("2024-03-05").is_some());

        // Offset is dropped, wall clock kept
        let ts = parse_timestamp("2024-03-05T08:15:00+03:00").unwrap();
        assert_eq!(time_label(Some(&ts)), "08:15");
    }

    #[test]
    fn test_malformed_degrades_to_sentinel() {
        for raw in ["", "   ", "yesterday", "2024-13-45T99:00:00"] {
            let ts = parse_timestamp(raw);
            assert!(ts.is_none(), "{raw:?} should not parse");
            assert_eq!(date_label(ts.as_ref()), UNKNOWN_DATE);
            assert_eq!(time_label(ts.as_ref()), UNKNOWN_TIME);
        }
    }
}
