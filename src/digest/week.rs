use std::fmt;

use chrono::{DateTime, Datelike, TimeDelta, Utc};

use crate::app::{FeedDigestError, Result};
use crate::domain::Entry;

/// ISO (year, week) pair identifying a weekly document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// ISO week of `at` shifted forward by `offset_hours`.
    ///
    /// A positive offset moves the week cut-off earlier than Monday 00:00:
    /// with 47 hours, Saturday 01:00 already belongs to the next week.
    pub fn of(at: DateTime<Utc>, offset_hours: i64) -> Option<Self> {
        let shifted = at.checked_add_signed(TimeDelta::try_hours(offset_hours)?)?;
        let iso = shifted.iso_week();
        Some(Self {
            year: iso.year(),
            week: iso.week(),
        })
    }

    pub fn for_entry(entry: &Entry, offset_hours: i64) -> Result<Self> {
        entry
            .published_at()
            .and_then(|at| Self::of(at, offset_hours))
            .ok_or_else(|| FeedDigestError::Digest {
                link: entry.link.clone(),
                published: entry.published.clone(),
            })
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.week)
    }
}

/// A run of consecutive entries sharing one [`WeekKey`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekBucket<'a> {
    pub key: WeekKey,
    pub items: &'a [Entry],
}

/// Splits `items` into week buckets in a single pass.
///
/// `items` must already be sorted by `published`; a bucket is closed as soon
/// as the key changes, so unsorted input yields fragmented buckets.
pub fn bucket(items: &[Entry], offset_hours: i64) -> Result<Vec<WeekBucket<'_>>> {
    let mut buckets = Vec::new();
    let mut open: Option<(WeekKey, usize)> = None;

    for (i, entry) in items.iter().enumerate() {
        let key = WeekKey::for_entry(entry, offset_hours)?;
        match open {
            Some((current, _)) if current == key => {}
            Some((current, start)) => {
                buckets.push(WeekBucket {
                    key: current,
                    items: &items[start..i],
                });
                open = Some((key, i));
            }
            None => open = Some((key, i)),
        }
    }

    if let Some((key, start)) = open {
        buckets.push(WeekBucket {
            key,
            items: &items[start..],
        });
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ErrorKind;
    use chrono::TimeZone;

    fn entry(link: &str, published: &str) -> Entry {
        Entry {
            title: link.into(),
            link: link.into(),
            description: String::new(),
            published: published.into(),
        }
    }

    fn keys(buckets: &[WeekBucket<'_>]) -> Vec<String> {
        buckets.iter().map(|b| b.key.to_string()).collect()
    }

    #[test]
    fn test_display_pads_week() {
        let key = WeekKey { year: 2025, week: 9 };
        assert_eq!(key.to_string(), "2025-09");
    }

    #[test]
    fn test_iso_year_differs_from_calendar_year() {
        let at = Utc.with_ymd_and_hms(2024, 12, 30, 12, 0, 0).unwrap();
        assert_eq!(WeekKey::of(at, 0), Some(WeekKey { year: 2025, week: 1 }));
    }

    #[test]
    fn test_offset_moves_cut_off_to_saturday() {
        let before = Utc.with_ymd_and_hms(2025, 3, 1, 0, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 3, 1, 1, 0, 0).unwrap();

        assert_eq!(WeekKey::of(before, 47).unwrap().to_string(), "2025-09");
        assert_eq!(WeekKey::of(after, 47).unwrap().to_string(), "2025-10");
        assert_eq!(WeekKey::of(after, 0).unwrap().to_string(), "2025-09");
    }

    #[test]
    fn test_negative_offset_moves_cut_off_past_monday() {
        let monday_noon = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();

        assert_eq!(WeekKey::of(monday_noon, 0).unwrap().to_string(), "2025-10");
        assert_eq!(WeekKey::of(monday_noon, -24).unwrap().to_string(), "2025-09");
        assert_eq!(WeekKey::of(tuesday, -24).unwrap().to_string(), "2025-10");
    }

    #[test]
    fn test_bucket_groups_consecutive_weeks() {
        let items = vec![
            entry("a", "2025-02-26T10:00:00Z"),
            entry("b", "2025-03-03T09:00:00Z"),
            entry("c", "2025-03-03T11:00:00Z"),
        ];
        let buckets = bucket(&items, 0).unwrap();

        assert_eq!(keys(&buckets), vec!["2025-09", "2025-10"]);
        assert_eq!(buckets[0].items.len(), 1);
        assert_eq!(buckets[1].items.len(), 2);
        assert_eq!(buckets[1].items[0].link, "b");
    }

    #[test]
    fn test_bucket_empty_input() {
        assert!(bucket(&[], 47).unwrap().is_empty());
    }

    #[test]
    fn test_bucket_covers_every_item_once() {
        let items: Vec<Entry> = (1..=28)
            .map(|day| entry(&format!("d{day}"), &format!("2025-02-{day:02}T12:00:00Z")))
            .collect();
        let buckets = bucket(&items, 47).unwrap();

        let total: usize = buckets.iter().map(|b| b.items.len()).sum();
        assert_eq!(total, items.len());
        for b in &buckets {
            for item in b.items {
                assert_eq!(WeekKey::for_entry(item, 47).unwrap(), b.key);
            }
        }
        let mut distinct = keys(&buckets);
        distinct.dedup();
        assert_eq!(distinct.len(), buckets.len());
    }

    #[test]
    fn test_bucket_rejects_corrupt_timestamp() {
        let items = vec![
            entry("a", "2025-02-26T10:00:00Z"),
            entry("b", "garbage"),
        ];
        let err = bucket(&items, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Digest);
        assert!(matches!(err, FeedDigestError::Digest { ref link, .. } if link == "b"));
    }
}
