//! Day-boundary clock.
//!
//! Timestamps are milliseconds since the Unix epoch. A "day" is always
//! [`DAY_MS`] long; daylight-saving shifts are not special-cased.

use chrono::{Local, NaiveDate, TimeZone, Utc};

/// Millisecond timestamp.
pub type Timestamp = i64;

/// Length of one day in milliseconds.
pub const DAY_MS: Timestamp = 86_400_000;

/// Source of the current day boundary.
pub trait Clock {
    /// Start of the current local calendar day.
    fn today(&self) -> Timestamp;
}

/// Clock backed by the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Timestamp {
        midnight(Local::now().date_naive())
    }
}

/// Clock pinned to a single day boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl FixedClock {
    /// Pin the clock to local midnight of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(midnight(date))
    }

    /// The same clock shifted by a whole number of days.
    pub fn plus_days(self, days: i64) -> Self {
        Self(self.0 + days * DAY_MS)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Timestamp {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> Timestamp {
        (**self).today()
    }
}

/// Local midnight of `date` as a timestamp.
///
/// Falls back to UTC midnight when the local zone skips midnight entirely.
pub fn midnight(date: NaiveDate) -> Timestamp {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.timestamp_millis(),
        None => Utc.from_utc_datetime(&naive).timestamp_millis(),
    }
}
