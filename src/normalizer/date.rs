//! Publication date handling for RSS `pubDate` values.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc, Weekday};

use crate::app::{FeedDigestError, Result};

/// Accepted `pubDate` layouts, tried in order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `Mon, 02 Jan 2006 15:04:05 GMT`
    Rfc1123,
    /// `Mon, 02 Jan 2006 15:04:05 -0700`
    Rfc1123Z,
    /// `02 Jan 06 15:04 GMT`
    Rfc822,
    /// `02 Jan 06 15:04 -0700`
    Rfc822Z,
    /// `Monday, 02-Jan-06 15:04:05 GMT`
    Rfc850,
    /// `2006-01-02T15:04:05Z` or `2006-01-02T15:04:05+07:00`
    Rfc3339,
}

const LAYOUTS: [Layout; 6] = [
    Layout::Rfc1123,
    Layout::Rfc1123Z,
    Layout::Rfc822,
    Layout::Rfc822Z,
    Layout::Rfc850,
    Layout::Rfc3339,
];

impl Layout {
    fn parse(self, s: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            Layout::Rfc1123 => parse_named_zone(strip_weekday(s)?, "%d %b %Y %H:%M:%S"),
            Layout::Rfc1123Z => {
                DateTime::parse_from_str(strip_weekday(s)?, "%d %b %Y %H:%M:%S %z").ok()
            }
            Layout::Rfc822 => parse_named_zone(s, "%d %b %y %H:%M"),
            Layout::Rfc822Z => DateTime::parse_from_str(s, "%d %b %y %H:%M %z").ok(),
            Layout::Rfc850 => parse_named_zone(strip_weekday(s)?, "%d-%b-%y %H:%M:%S"),
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(s).ok(),
        }
    }
}

/// Removes a leading `Day,` token. The name must be a weekday, but it is not
/// checked against the date; feeds often get it wrong.
fn strip_weekday(s: &str) -> Option<&str> {
    let (day, rest) = s.split_once(',')?;
    day.parse::<Weekday>().ok()?;
    Some(rest.trim_start())
}

/// Parses the datetime part with `fmt` and the trailing token as a zone name.
fn parse_named_zone(s: &str, fmt: &str) -> Option<DateTime<FixedOffset>> {
    let (datetime, zone) = s.rsplit_once(' ')?;
    let offset = zone_offset(zone)?;
    let naive = NaiveDateTime::parse_from_str(datetime.trim_end(), fmt).ok()?;
    offset.from_local_datetime(&naive).single()
}

/// RFC 822 zone names. Any other abbreviation of three to five capital
/// letters (`CET`, `BST`) is read as UTC.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "GMT" | "UT" | "UTC" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ if (3..=5).contains(&zone.len()) && zone.bytes().all(|b| b.is_ascii_uppercase()) => 0,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

/// Parses a `pubDate` value into a UTC instant.
pub fn parse_pub_date(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FeedDigestError::PubDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::format_timestamp;

    fn normalized(raw: &str) -> String {
        format_timestamp(&parse_pub_date(raw).unwrap())
    }

    #[test]
    fn test_rfc1123_gmt() {
        assert_eq!(normalized("Fri, 28 Feb 2025 10:00:00 GMT"), "2025-02-28T10:00:00Z");
    }

    #[test]
    fn test_rfc1123_numeric_zone() {
        assert_eq!(normalized("Fri, 28 Feb 2025 10:00:00 +0300"), "2025-02-28T07:00:00Z");
        assert_eq!(normalized("Fri, 28 Feb 2025 22:30:00 -0700"), "2025-03-01T05:30:00Z");
    }

    #[test]
    fn test_rfc1123_north_american_zone() {
        assert_eq!(normalized("Fri, 28 Feb 2025 10:00:00 EST"), "2025-02-28T15:00:00Z");
    }

    #[test]
    fn test_rfc822() {
        assert_eq!(normalized("28 Feb 25 10:00 GMT"), "2025-02-28T10:00:00Z");
        assert_eq!(normalized("28 Feb 25 10:00 +0100"), "2025-02-28T09:00:00Z");
    }

    #[test]
    fn test_rfc850() {
        assert_eq!(normalized("Friday, 28-Feb-25 10:00:00 UTC"), "2025-02-28T10:00:00Z");
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(normalized("2025-02-28T10:00:00Z"), "2025-02-28T10:00:00Z");
        assert_eq!(normalized("2025-02-28T12:00:00+02:00"), "2025-02-28T10:00:00Z");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(normalized("\n  Fri, 28 Feb 2025 10:00:00 GMT  "), "2025-02-28T10:00:00Z");
    }

    #[test]
    fn test_mismatched_weekday_is_ignored() {
        // 28 Feb 2025 was a Friday.
        assert_eq!(normalized("Thu, 28 Feb 2025 10:00:00 GMT"), "2025-02-28T10:00:00Z");
        assert_eq!(normalized("Mon, 28 Feb 2025 10:00:00 +0100"), "2025-02-28T09:00:00Z");
        assert_eq!(normalized("Sunday, 28-Feb-25 10:00:00 UTC"), "2025-02-28T10:00:00Z");
    }

    #[test]
    fn test_unlisted_zone_abbreviation_reads_as_utc() {
        for zone in ["CET", "BST", "MSK", "AEST"] {
            let raw = format!("Fri, 28 Feb 2025 10:00:00 {zone}");
            assert_eq!(normalized(&raw), "2025-02-28T10:00:00Z");
        }
        assert_eq!(normalized("28 Feb 25 10:00 CET"), "2025-02-28T10:00:00Z");
    }

    #[test]
    fn test_unknown_formats_fail() {
        for raw in [
            "",
            "yesterday",
            "2025/02/28",
            "Xyz, 28 Feb 2025 10:00:00 GMT",
            "Fri, 28 Feb 2025 10:00:00 Gmt1",
            "Fri, 28 Feb 2025 10:00:00 cet",
        ] {
            let err = parse_pub_date(raw).unwrap_err();
            assert!(matches!(err, FeedDigestError::PubDate(ref s) if s == raw));
        }
    }
}
