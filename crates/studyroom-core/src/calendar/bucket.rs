//! Grouping of timestamped records by local calendar date.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Group `events` by the local calendar date of the timestamp selected
/// by `timestamp`, in `tz`.
///
/// Every event lands in exactly one bucket; insertion order is kept
/// within a bucket and the map iterates days in ascending order. The
/// key is the LOCAL date, so an event at 23:30 UTC in a UTC+9 zone is
/// bucketed under the following day.
pub fn group_by_local_date<T, Tz, F>(
    events: &[T],
    tz: &Tz,
    timestamp: F,
) -> BTreeMap<NaiveDate, Vec<T>>
where
    T: Clone,
    Tz: TimeZone,
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut buckets: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for event in events {
        let day = timestamp(event).with_timezone(tz).date_naive();
        buckets.entry(day).or_default().push(event.clone());
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[derive(Debug, Clone, PartialEq)]
    struct Stamped {
        name: &'static str,
        at: DateTime<Utc>,
    }

    fn stamped(name: &'static str, y: i32, m: u32, d: u32, h: u32, min: u32) -> Stamped {
        Stamped {
            name,
            at: Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap(),
        }
    }

    #[test]
    fn test_groups_by_day_preserving_order() {
        let events = vec![
            stamped("b", 2025, 3, 10, 9, 0),
            stamped("a", 2025, 3, 10, 8, 0),
            stamped("c", 2025, 3, 11, 7, 0),
        ];
        let buckets = group_by_local_date(&events, &Utc, |e| e.at);

        assert_eq!(buckets.len(), 2);
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let names: Vec<_> = buckets[&day].iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_keys_by_local_date_not_utc() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let events = vec![stamped("late", 2025, 3, 10, 23, 30)];
        let buckets = group_by_local_date(&events, &tz, |e| e.at);

        // 23:30 UTC on the 10th is 08:30 on the 11th in UTC+9.
        let local_day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert!(buckets.contains_key(&local_day));
        assert!(!buckets.contains_key(&NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
    }

    #[test]
    fn test_no_events_no_buckets() {
        let buckets = group_by_local_date::<Stamped, _, _>(&[], &Utc, |e| e.at);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_every_event_lands_exactly_once() {
        let events: Vec<_> = (0u32..50)
            .map(|i| stamped("e", 2025, 3, 1 + (i % 5), i % 24, 0))
            .collect();
        let buckets = group_by_local_date(&events, &Utc, |e| e.at);
        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, events.len());
    }
}
