use crate::utils::time::{Clock, DayBoundary, MILLISECONDS_IN_DAY};

/// Which day's leaderboard a read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelector {
    /// Today in the reference timezone
    Current,
    /// `n` days before today
    DaysBefore(u32),
    /// The day containing this epoch-millisecond timestamp
    At(i64)
}

impl DaySelector {
    /// Start of the selected day; `None` when that day cannot be represented.
    pub fn resolve(self, boundary: &DayBoundary, clock: &dyn Clock) -> Option<i64> {
        match self {
            DaySelector::Current => boundary.current_day(clock),
            DaySelector::DaysBefore(n) => boundary
                .current_day(clock)?
                .checked_sub(n as i64 * MILLISECONDS_IN_DAY),
            DaySelector::At(timestamp) => boundary.day_start(timestamp)
        }
    }
}

impl From<Option<u32>> for DaySelector {
    fn from(days_before: Option<u32>) -> Self {
        days_before.map_or(DaySelector::Current, DaySelector::DaysBefore)
    }
}

#[cfg(test)]
mod tests {
    use super::DaySelector;
    use crate::utils::time::{DayBoundary, ManualClock, MILLISECONDS_IN_DAY};

    #[test]
    fn test_resolve() {
        let boundary = DayBoundary::utc();
        let today = 20 * MILLISECONDS_IN_DAY;
        let clock = ManualClock::new(today + 5_000);

        assert_eq!(DaySelector::Current.resolve(&boundary, &clock), Some(today));
        assert_eq!(DaySelector::DaysBefore(0).resolve(&boundary, &clock), Some(today));
        assert_eq!(
            DaySelector::DaysBefore(3).resolve(&boundary, &clock),
            Some(today - 3 * MILLISECONDS_IN_DAY)
        );
        assert_eq!(
            DaySelector::At(today - 1).resolve(&boundary, &clock),
            Some(today - MILLISECONDS_IN_DAY)
        );
    }

    #[test]
    fn test_resolve_out_of_range() {
        let boundary = DayBoundary::utc();
        let clock = ManualClock::new(20 * MILLISECONDS_IN_DAY);

        assert_eq!(DaySelector::At(i64::MIN).resolve(&boundary, &clock), None);
        assert_eq!(DaySelector::At(i64::MAX).resolve(&boundary, &clock), None);
        assert!(DaySelector::DaysBefore(u32::MAX).resolve(&boundary, &clock).is_some());
    }

    #[test]
    fn test_from_days_before() {
        assert_eq!(DaySelector::from(None), DaySelector::Current);
        assert_eq!(DaySelector::from(Some(1)), DaySelector::DaysBefore(1));
    }
}
