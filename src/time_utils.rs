// src/time_utils.rs
//! Posting-date helpers: lenient parsing, relative labels and recency checks.
//!
//! Feed dates are free text. Anything that does not parse collapses to the
//! sentinel instant (the Unix epoch), which sorts before every real date,
//! renders as "Unknown" and never satisfies a recency window.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Instant standing in for an empty or unparseable date
pub const SENTINEL: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a feed date. Never fails; returns [`SENTINEL`] on empty or bad input.
///
/// Offset-less timestamps and bare dates are read as UTC. An all-digit value
/// is epoch milliseconds.
pub fn parse_instant(text: &str) -> DateTime<Utc> {
    let text = text.trim();
    if text.is_empty() {
        return SENTINEL;
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(SENTINEL);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return dt.with_timezone(&Utc);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return dt.with_timezone(&Utc);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return naive.and_utc();
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(SENTINEL)
}

pub fn is_sentinel(instant: &DateTime<Utc>) -> bool {
    *instant == SENTINEL
}

fn elapsed_days(instant: &DateTime<Utc>, now: &DateTime<Utc>) -> f64 {
    (*now - *instant).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Human label for how long ago `text` was posted, relative to the wall clock
pub fn format_relative(text: &str) -> String {
    format_relative_at(text, Utc::now())
}

pub fn format_relative_at(text: &str, now: DateTime<Utc>) -> String {
    let instant = parse_instant(text);
    if is_sentinel(&instant) {
        return "Unknown".to_string();
    }

    // Future dates land below zero; show them as today.
    let days = elapsed_days(&instant, &now).floor() as i64;
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

/// True when `text` parses and lies at most `days` (fractional) before now
pub fn is_within_days(text: &str, days: u32) -> bool {
    is_within_days_at(text, days, Utc::now())
}

pub fn is_within_days_at(text: &str, days: u32, now: DateTime<Utc>) -> bool {
    let instant = parse_instant(text);
    if is_sentinel(&instant) {
        return false;
    }

    elapsed_days(&instant, &now) <= f64::from(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_instant_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert_eq!(parse_instant("2024-05-01T12:00:00Z"), expected);
        assert_eq!(parse_instant("2024-05-01T14:00:00+02:00"), expected);
        assert_eq!(parse_instant("2024-05-01T12:00:00.000Z"), expected);
        assert_eq!(parse_instant("2024-05-01T12:00:00"), expected);
        assert_eq!(parse_instant("2024-05-01 12:00:00"), expected);
        assert_eq!(parse_instant("Wed, 01 May 2024 12:00:00 +0000"), expected);
        assert_eq!(parse_instant("  2024-05-01T12:00:00Z  "), expected);
        assert_eq!(
            parse_instant("2024-05-01"),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_instant_epoch_millis() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert_eq!(parse_instant("1714564800000"), expected);
        assert_eq!(parse_instant(" 1714564800000 "), expected);
        assert_eq!(format_relative_at("1714564800000", expected + Duration::days(3)), "3 days ago");
        assert!(is_sentinel(&parse_instant("99999999999999999999999")));
    }

    #[test]
    fn test_parse_instant_falls_back_to_sentinel() {
        for text in ["", "   ", "garbage", "yesterday", "2024-13-45", "05/01/2024"] {
            assert!(is_sentinel(&parse_instant(text)), "{text:?} should be sentinel");
        }
    }

    #[test]
    fn test_format_relative_labels() {
        let now = now();
        let fmt = |offset: Duration| (now - offset).to_rfc3339();

        assert_eq!(format_relative_at(&fmt(Duration::hours(3)), now), "Today");
        assert_eq!(format_relative_at(&fmt(Duration::hours(30)), now), "1 day ago");
        assert_eq!(format_relative_at(&fmt(Duration::hours(47)), now), "1 day ago");
        assert_eq!(format_relative_at(&fmt(Duration::days(10)), now), "10 days ago");
        assert_eq!(format_relative_at("not a date", now), "Unknown");
        assert_eq!(format_relative_at("", now), "Unknown");
    }

    #[test]
    fn test_format_relative_future_is_today() {
        let now = now();
        let tomorrow = (now + Duration::hours(20)).to_rfc3339();
        assert_eq!(format_relative_at(&tomorrow, now), "Today");
    }

    #[test]
    fn test_is_within_days_uses_fractional_days() {
        let now = now();
        let ten_days = (now - Duration::days(10)).to_rfc3339();
        assert!(!is_within_days_at(&ten_days, 7, now));
        assert!(is_within_days_at(&ten_days, 14, now));
        assert!(is_within_days_at(&ten_days, 10, now));

        let just_over = (now - Duration::days(7) - Duration::minutes(1)).to_rfc3339();
        assert!(!is_within_days_at(&just_over, 7, now));
    }

    #[test]
    fn test_is_within_days_rejects_sentinel() {
        let now = now();
        for days in [0, 7, 14, 30, 60, u32::MAX] {
            assert!(!is_within_days_at("", days, now));
            assert!(!is_within_days_at("garbage", days, now));
        }
    }

    #[test]
    fn test_sentinel_sorts_first() {
        let mut dates = vec![
            parse_instant("2024-05-01"),
            parse_instant("garbage"),
            parse_instant("2023-01-01"),
        ];
        dates.sort();
        assert!(is_sentinel(&dates[0]));
    }
}
