//! Fixed-pattern timestamp parsing for the record store.
//!
//! The store interchanges clock times as `HH:MM` strings and dates as
//! `MM/DD/YYYY` strings. Parsing is total: a malformed or empty string maps
//! to an absent value, never an error, so one bad cell cannot abort a whole
//! report. The formatting functions emit exactly these patterns for writes.

use chrono::{NaiveDate, NaiveTime};

/// Clock times are stored as e.g. "09:05".
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Dates are stored as e.g. "04/06/2025".
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse a stored clock time. Empty or malformed input yields `None`.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(raw, CLOCK_FORMAT).ok()
}

/// Parse a stored visit date. Empty or malformed input yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Format a clock time for the store.
pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Format a visit date for the store.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_valid() {
        assert_eq!(
            parse_clock("09:30"),
            Some(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
        // chrono accepts an unpadded hour
        assert_eq!(
            parse_clock("9:05"),
            Some(NaiveTime::from_hms_opt(9, 5, 0).unwrap())
        );
        assert_eq!(
            parse_clock("  17:45  "),
            Some(NaiveTime::from_hms_opt(17, 45, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_clock_malformed_is_absent() {
        for raw in ["", "   ", "25:00", "09:70", "0930", "09:30:15", "noon"] {
            assert_eq!(parse_clock(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(
            parse_date("04/06/2025"),
            Some(NaiveDate::from_ymd_opt(2025, 4, 6).unwrap())
        );
    }

    #[test]
    fn test_parse_date_malformed_is_absent() {
        for raw in ["", "2025-04-06", "13/40/2025", "April 6, 2025"] {
            assert_eq!(parse_date(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn test_format_round_trip() {
        let time = NaiveTime::from_hms_opt(8, 5, 0).unwrap();
        assert_eq!(format_clock(time), "08:05");
        assert_eq!(parse_clock(&format_clock(time)), Some(time));

        let date = NaiveDate::from_ymd_opt(2025, 4, 6).unwrap();
        assert_eq!(format_date(date), "04/06/2025");
        assert_eq!(parse_date(&format_date(date)), Some(date));
    }
}
