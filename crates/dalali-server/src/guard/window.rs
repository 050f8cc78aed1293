use chrono::{Duration, NaiveDate};

use super::DateRange;

/// Bookings starting further out than this are ignored when suggesting dates.
pub const LOOKAHEAD_DAYS: i64 = 180;

/// Earliest window of `days` days, starting no sooner than `from`, that avoids
/// every active booking in `bookings` (inclusive `(start, end)` pairs).
///
/// Scans bookings in start order and returns the first gap that is long
/// enough. When no gap fits before the last booking the window starts the day
/// after it. Returns `None` when that window would end past `NaiveDate::MAX`.
pub fn next_available_window(
    bookings: &[(NaiveDate, NaiveDate)],
    from: NaiveDate,
    days: i64,
) -> Option<DateRange> {
    let horizon = lookahead_horizon(from);
    let mut relevant: Vec<(NaiveDate, NaiveDate)> = bookings
        .iter()
        .copied()
        .filter(|&(start, end)| end >= from && start <= horizon)
        .collect();
    relevant.sort_unstable_by_key(|&(start, _)| start);

    let mut cursor = from;
    for (start, end) in relevant {
        if start > cursor && (start - cursor).num_days() >= days {
            break;
        }
        if end >= cursor {
            cursor = end.succ_opt()?;
        }
    }

    DateRange::starting_at(cursor, days)
}

/// Last start date considered when suggesting a window from `from`.
pub(crate) fn lookahead_horizon(from: NaiveDate) -> NaiveDate {
    from.checked_add_signed(Duration::days(LOOKAHEAD_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_window_after_single_booking() {
        let window = next_available_window(&[(d(9, 3), d(9, 5))], d(9, 1), 7).unwrap();
        assert_eq!(window, DateRange::new(d(9, 6), d(9, 12)).unwrap());
    }

    #[test]
    fn test_uses_first_gap_that_fits() {
        let bookings = [(d(9, 20), d(9, 25)), (d(9, 3), d(9, 5))];
        let window = next_available_window(&bookings, d(9, 1), 7).unwrap();
        assert_eq!(window.start, d(9, 6));
        assert_eq!(window.end, d(9, 12));
    }

    #[test]
    fn test_skips_gaps_that_are_too_short() {
        let bookings = [(d(9, 3), d(9, 5)), (d(9, 10), d(9, 12))];
        let window = next_available_window(&bookings, d(9, 1), 7).unwrap();
        assert_eq!(window.start, d(9, 13));
        assert_eq!(window.days(), 7);
    }

    #[test]
    fn test_gap_before_first_booking() {
        let window = next_available_window(&[(d(9, 20), d(9, 22))], d(9, 1), 5).unwrap();
        assert_eq!(window, DateRange::new(d(9, 1), d(9, 5)).unwrap());
    }

    #[test]
    fn test_exact_fit_gap() {
        // Sep 6..=Sep 9 is four free days
        let bookings = [(d(9, 1), d(9, 5)), (d(9, 10), d(9, 12))];
        let window = next_available_window(&bookings, d(9, 1), 4).unwrap();
        assert_eq!(window, DateRange::new(d(9, 6), d(9, 9)).unwrap());
    }

    #[test]
    fn test_overlapping_bookings_extend_cursor() {
        let bookings = [(d(9, 1), d(9, 10)), (d(9, 4), d(9, 6))];
        let window = next_available_window(&bookings, d(9, 1), 2).unwrap();
        assert_eq!(window.start, d(9, 11));
    }

    #[test]
    fn test_ignores_past_and_far_future_bookings() {
        let bookings = [(d(8, 1), d(8, 10)), (d(9, 3), d(9, 5))];
        let far = next_available_window(&bookings, d(1, 1), 3).unwrap();
        assert_eq!(far.start, d(1, 1));

        let window = next_available_window(&bookings, d(8, 5), 3).unwrap();
        assert_eq!(window.start, d(8, 11));
    }

    #[test]
    fn test_no_window_past_last_date() {
        let max = NaiveDate::MAX;
        let bookings = [(max - Duration::days(10), max - Duration::days(5))];
        assert_eq!(next_available_window(&bookings, max - Duration::days(10), 7), None);

        let window = next_available_window(&bookings, max - Duration::days(10), 5).unwrap();
        assert_eq!(window, DateRange::new(max - Duration::days(4), max).unwrap());

        let booked_to_end = [(max - Duration::days(3), max)];
        assert_eq!(next_available_window(&booked_to_end, max - Duration::days(3), 2), None);
        assert_eq!(lookahead_horizon(max - Duration::days(1)), max);
    }
}
