//! Date/time display formatting for composed messages

use chrono::{NaiveDate, NaiveTime};

/// Format a wedding date for message bodies ("Saturday, 14 March 2026")
///
/// Accepts an ISO `YYYY-MM-DD` string as stored in wedding settings; input
/// that fails to parse is passed through unchanged rather than aborting a
/// send batch.
pub fn format_long_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%A, %-d %B %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Format a 24h `HH:MM` time as 12h ("17:30" -> "5:30 PM")
pub fn format_12h_time(time: &str) -> String {
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(t) => t.format("%-I:%M %p").to_string(),
        Err(_) => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_long_date() {
        assert_eq!(format_long_date("2026-03-14"), "Saturday, 14 March 2026");
    }

    #[test]
    fn test_format_long_date_passthrough_on_parse_failure() {
        assert_eq!(format_long_date("next spring"), "next spring");
    }

    #[test]
    fn test_format_12h_time() {
        assert_eq!(format_12h_time("17:30"), "5:30 PM");
        assert_eq!(format_12h_time("09:05"), "9:05 AM");
        assert_eq!(format_12h_time("00:15"), "12:15 AM");
        assert_eq!(format_12h_time("12:00"), "12:00 PM");
    }
}
