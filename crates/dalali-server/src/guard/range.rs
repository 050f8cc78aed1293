use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::GuardError;

/// A booking window with both ends inclusive. Always `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, GuardError> {
        if end <= start {
            return Err(GuardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window of `days` calendar days beginning at `start`, or `None` when it
    /// would run past the last representable date.
    pub(crate) fn starting_at(start: NaiveDate, days: i64) -> Option<Self> {
        let end = start.checked_add_signed(Duration::days(days.max(1) - 1))?;
        Some(Self { start, end })
    }

    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && self.end >= start
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_inverted_ranges() {
        assert!(matches!(
            DateRange::new(d(5), d(5)),
            Err(GuardError::InvalidRange { .. })
        ));
        assert!(DateRange::new(d(6), d(5)).is_err());
        assert!(DateRange::new(d(5), d(6)).is_ok());
    }

    #[test]
    fn test_days_counts_both_ends() {
        assert_eq!(DateRange::new(d(1), d(7)).unwrap().days(), 7);
        assert_eq!(DateRange::new(d(1), d(2)).unwrap().days(), 2);
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let requested = DateRange::new(d(1), d(7)).unwrap();
        assert!(requested.overlaps(d(3), d(5)));
        assert!(requested.overlaps(d(7), d(9)));
        let aug_31 = NaiveDate::from_ymd_opt(2025, 8, 31).unwrap();
        assert!(requested.overlaps(aug_31, d(1)));

        let short = DateRange::new(d(1), d(2)).unwrap();
        assert!(!short.overlaps(d(3), d(5)));
    }

    #[test]
    fn test_starting_at() {
        let window = DateRange::starting_at(d(6), 7).unwrap();
        assert_eq!(window.start, d(6));
        assert_eq!(window.end, d(12));
        assert_eq!(window.days(), 7);
    }

    #[test]
    fn test_starting_at_past_last_date() {
        assert!(DateRange::starting_at(NaiveDate::MAX, 2).is_none());
        let last_week = NaiveDate::MAX - Duration::days(6);
        assert_eq!(DateRange::starting_at(last_week, 7).unwrap().end, NaiveDate::MAX);
    }
}
