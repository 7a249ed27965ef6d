use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

pub const MILLISECONDS_IN_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of "now" for everything that ages or touches leaderboards.
/// Injected so tests can pin the current day.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64
}

impl ManualClock {
    pub fn new(now_ms: i64) -> ManualClock {
        ManualClock {
            now: AtomicI64::new(now_ms)
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta: i64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance_ms(days * MILLISECONDS_IN_DAY);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Calendar day arithmetic in the fixed reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset
}

impl Default for DayBoundary {
    fn default() -> Self {
        DayBoundary::utc()
    }
}

impl DayBoundary {
    pub fn utc() -> DayBoundary {
        DayBoundary {
            offset: Utc.fix()
        }
    }

    /// Returns `None` when the offset is a day or more away from UTC.
    pub fn from_offset_minutes(minutes: i32) -> Option<DayBoundary> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| DayBoundary { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Start of the calendar day containing `timestamp_ms`, as epoch
    /// milliseconds. `None` when the day lies outside what chrono can
    /// represent.
    pub fn day_start(&self, timestamp_ms: i64) -> Option<i64> {
        DateTime::from_timestamp_millis(timestamp_ms)
            .map(|utc| utc.with_timezone(&self.offset))
            .and_then(|dt| dt.date_naive().and_hms_opt(0, 0, 0))
            .and_then(|midnight| self.offset.from_local_datetime(&midnight).single())
            .map(|start| start.timestamp_millis())
    }

    pub fn current_day(&self, clock: &dyn Clock) -> Option<i64> {
        self.day_start(clock.now_ms())
    }

    /// Whole days between two day starts (`later - earlier`), saturating at
    /// the ends of the `i64` range.
    pub fn days_between(earlier_day: i64, later_day: i64) -> i64 {
        later_day.saturating_sub(earlier_day).div_euclid(MILLISECONDS_IN_DAY)
    }
}
