//! Formatting helpers shared by the report renderers.
//!
//! Statistics keep full precision internally; these helpers own the
//! one-decimal rounding and the "n/a" rendering of undefined values.

use chrono::NaiveDate;

/// Format a mean in minutes, one decimal place, or "n/a" when undefined.
pub fn format_minutes(value: Option<f64>) -> String {
    match value {
        Some(minutes) => format!("{:.1}", minutes),
        None => "n/a".to_string(),
    }
}

/// Format a 0.0–1.0 coverage fraction as a whole percent, or "n/a".
pub fn format_coverage(value: Option<f64>) -> String {
    match value {
        Some(fraction) => format!("{:.0}%", fraction * 100.0),
        None => "n/a".to_string(),
    }
}

/// Format a fractional change as a signed percent (e.g. "+25.0%"), or "n/a"
/// when the change is undefined.
pub fn format_delta(value: Option<f64>) -> String {
    match value {
        Some(fraction) => format!("{:+.1}%", fraction * 100.0),
        None => "n/a".to_string(),
    }
}

/// Format a date the way the dashboard header does (e.g. "March 05, 2025").
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(Some(42.349)), "42.3");
        assert_eq!(format_minutes(Some(0.0)), "0.0");
        assert_eq!(format_minutes(None), "n/a");
    }

    #[test]
    fn test_format_coverage() {
        assert_eq!(format_coverage(Some(0.845)), "84%");
        assert_eq!(format_coverage(Some(0.0)), "0%");
        assert_eq!(format_coverage(None), "n/a");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(Some(0.25)), "+25.0%");
        assert_eq!(format_delta(Some(-1.0)), "-100.0%");
        assert_eq!(format_delta(None), "n/a");
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(format_long_date(date), "March 05, 2025");
    }
}
