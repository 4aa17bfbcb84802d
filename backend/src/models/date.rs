//! Calendar date parsing for the two date layouts found in the source tables.
//!
//! Time-series headers use `M/D/YY` (e.g. `1/22/20`), the lockdown table uses
//! ISO `YYYY-MM-DD`. Both parsers return `None` for malformed input instead of
//! failing, so callers decide whether a bad date skips a row or a column.

use chrono::NaiveDate;

/// Header layout of the wide time-series tables.
pub const SERIES_DATE_FORMAT: &str = "%m/%d/%y";

/// Layout of the `Date of action` column of the lockdown table.
pub const ACTION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a time-series column header such as `3/7/20`.
pub fn parse_series_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), SERIES_DATE_FORMAT).ok()
}

/// Parse an ISO action date such as `2020-03-09`.
pub fn parse_action_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ACTION_DATE_FORMAT).ok()
}

/// Render a date the way series headers are written (`3/7/20`).
pub fn format_series_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}/{}/{:02}", date.month(), date.day(), date.year() % 100)
}
