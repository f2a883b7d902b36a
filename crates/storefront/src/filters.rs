//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, Datelike, Utc};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(Utc::now().year())
}

/// Formats a Unix timestamp (seconds) as e.g. `Nov 14th 2023`.
///
/// Values that are not a valid timestamp are rendered unchanged.
///
/// Usage in templates: `{{ order.created|ordinal_date }}`
#[askama::filter_fn]
pub fn ordinal_date(timestamp: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = timestamp.to_string();
    Ok(raw
        .parse::<i64>()
        .ok()
        .and_then(format_ordinal_date)
        .unwrap_or(raw))
}

/// Month abbreviation, day with ordinal suffix, and year, in UTC.
#[must_use]
pub fn format_ordinal_date(timestamp: i64) -> Option<String> {
    let date = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    Some(format!("{} {day}{suffix} {}", date.format("%b"), date.year()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ordinal_date() {
        assert_eq!(
            format_ordinal_date(1_700_000_000).as_deref(),
            Some("Nov 14th 2023")
        );
        // 2024-03-01, 2024-03-02, 2024-03-03, 2024-03-11, 2024-03-22
        assert_eq!(format_ordinal_date(1_709_251_200).as_deref(), Some("Mar 1st 2024"));
        assert_eq!(format_ordinal_date(1_709_337_600).as_deref(), Some("Mar 2nd 2024"));
        assert_eq!(format_ordinal_date(1_709_424_000).as_deref(), Some("Mar 3rd 2024"));
        assert_eq!(format_ordinal_date(1_710_115_200).as_deref(), Some("Mar 11th 2024"));
        assert_eq!(format_ordinal_date(1_711_065_600).as_deref(), Some("Mar 22nd 2024"));
    }

    #[test]
    fn test_format_ordinal_date_out_of_range() {
        assert_eq!(format_ordinal_date(i64::MAX), None);
    }
}
