//! Locale-sensitive date formatting.
//!
//! Turns raw ISO date strings from frontmatter into display text for a
//! locale, always rendering the UTC calendar date so output never depends
//! on the server's timezone. Bad input degrades to a fixed sentinel value
//! instead of an error.

use crate::i18n::Locale;
use chrono::{DateTime, NaiveDate, Utc};

/// A formatted date: display text plus the machine-readable original.
///
/// `date_time` is suitable for a `<time datetime="...">` attribute and is
/// the original input string, unmodified, whenever parsing succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDate {
    /// Human-readable display text in the target locale
    pub text: String,

    /// Machine-readable timestamp value (empty for the sentinel)
    pub date_time: String,
}

impl FormattedDate {
    /// The fallback value for missing or unparseable input.
    pub fn sentinel() -> FormattedDate {
        FormattedDate {
            text: "-".to_string(),
            date_time: String::new(),
        }
    }

    /// Check whether this value is the missing-date sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.date_time.is_empty() && self.text == "-"
    }
}

/// Format a raw date string for display in a locale.
///
/// Accepts plain calendar dates (`2025-12-06`) and RFC 3339 timestamps;
/// timestamps are converted to their UTC calendar date before rendering, so
/// identical input produces identical output wherever the process runs.
///
/// # Arguments
/// * `value` - The raw date string, if the document carried one
/// * `locale` - The locale whose long-date convention to render with
///
/// # Returns
/// The formatted date, or the sentinel when input is absent, empty, or not
/// a parseable date. Never an error.
pub fn format_display_date(value: Option<&str>, locale: Locale) -> FormattedDate {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return FormattedDate::sentinel(),
    };

    let date = match parse_calendar_date(raw) {
        Some(date) => date,
        None => return FormattedDate::sentinel(),
    };

    FormattedDate {
        text: render_for_locale(date, locale),
        date_time: raw.to_string(),
    }
}

/// Parse a raw string into a UTC calendar date.
///
/// Tries a plain `YYYY-MM-DD` date first, then a full RFC 3339 timestamp
/// (converted to UTC before taking the date).
fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc).date_naive());
    }

    None
}

/// Render a calendar date using the locale's long-date convention.
///
/// English: "December 6, 2025". Korean: "2025년 12월 6일".
fn render_for_locale(date: NaiveDate, locale: Locale) -> String {
    match locale.code() {
        "en" => date.format("%B %-d, %Y").to_string(),
        _ => date.format("%Y년 %-m월 %-d일").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Sentinel Tests ====================

    #[test]
    fn test_missing_value_returns_sentinel() {
        for locale in [Locale::KOREAN, Locale::ENGLISH] {
            let formatted = format_display_date(None, locale);
            assert!(formatted.is_sentinel());
            assert_eq!(formatted.text, "-");
            assert_eq!(formatted.date_time, "");
        }
    }

    #[test]
    fn test_empty_value_returns_sentinel() {
        for locale in [Locale::KOREAN, Locale::ENGLISH] {
            assert!(format_display_date(Some(""), locale).is_sentinel());
            assert!(format_display_date(Some("   "), locale).is_sentinel());
        }
    }

    #[test]
    fn test_unparseable_value_returns_sentinel() {
        for locale in [Locale::KOREAN, Locale::ENGLISH] {
            assert!(format_display_date(Some("invalid-date"), locale).is_sentinel());
            assert!(format_display_date(Some("not a date at all"), locale).is_sentinel());
        }
    }

    #[test]
    fn test_out_of_range_date_returns_sentinel() {
        let formatted = format_display_date(Some("2025-13-45"), Locale::ENGLISH);
        assert!(formatted.is_sentinel());
    }

    // ==================== English Formatting Tests ====================

    #[test]
    fn test_english_long_date() {
        let formatted = format_display_date(Some("2025-12-06"), Locale::ENGLISH);
        assert_eq!(formatted.text, "December 6, 2025");
        assert_eq!(formatted.date_time, "2025-12-06");
    }

    #[test]
    fn test_english_single_digit_day_unpadded() {
        let formatted = format_display_date(Some("2025-01-05"), Locale::ENGLISH);
        assert_eq!(formatted.text, "January 5, 2025");
    }

    // ==================== Korean Formatting Tests ====================

    #[test]
    fn test_korean_long_date() {
        let formatted = format_display_date(Some("2025-12-06"), Locale::KOREAN);
        assert_eq!(formatted.text, "2025년 12월 6일");
        assert_eq!(formatted.date_time, "2025-12-06");
    }

    #[test]
    fn test_korean_single_digit_parts_unpadded() {
        let formatted = format_display_date(Some("2025-01-05"), Locale::KOREAN);
        assert_eq!(formatted.text, "2025년 1월 5일");
    }

    // ==================== UTC Invariance Tests ====================

    #[test]
    fn test_rfc3339_rendered_as_utc_calendar_date() {
        // 23:30 at +09:00 is 14:30 UTC, still December 6th
        let formatted =
            format_display_date(Some("2025-12-06T23:30:00+09:00"), Locale::ENGLISH);
        assert_eq!(formatted.text, "December 6, 2025");
        assert_eq!(formatted.date_time, "2025-12-06T23:30:00+09:00");
    }

    #[test]
    fn test_rfc3339_crossing_midnight_in_utc() {
        // 20:00 at -05:00 is 01:00 UTC on December 7th
        let formatted =
            format_display_date(Some("2025-12-06T20:00:00-05:00"), Locale::ENGLISH);
        assert_eq!(formatted.text, "December 7, 2025");
    }

    #[test]
    fn test_rfc3339_zulu_offset() {
        let formatted = format_display_date(Some("2025-12-06T10:00:00Z"), Locale::KOREAN);
        assert_eq!(formatted.text, "2025년 12월 6일");
    }

    // ==================== Idempotence Tests ====================

    #[test]
    fn test_formatting_is_idempotent() {
        let first = format_display_date(Some("2025-12-06"), Locale::ENGLISH);
        let second = format_display_date(Some("2025-12-06"), Locale::ENGLISH);
        assert_eq!(first, second);

        let first = format_display_date(Some("2025-12-06"), Locale::KOREAN);
        let second = format_display_date(Some("2025-12-06"), Locale::KOREAN);
        assert_eq!(first, second);
    }
}
