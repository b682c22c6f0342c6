//! # Clock
//!
//! The engine never calls `Utc::now()` directly; it asks a [`Clock`].
//! Production uses [`SystemClock`], tests pin time with [`FixedClock`].

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::fmt;
use std::sync::Mutex;

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that returns a set instant until told otherwise.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        // A poisoned lock still holds a valid instant
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Calendar day of `now` in the branch's timezone.
///
/// ## Example
/// ```rust
/// use caja_ledger::clock::business_date;
/// use chrono::{FixedOffset, TimeZone, Utc};
///
/// // 01:30 UTC is still the previous evening in Buenos Aires (UTC-3)
/// let now = Utc.with_ymd_and_hms(2026, 3, 15, 1, 30, 0).unwrap();
/// let offset = FixedOffset::west_opt(3 * 3600).unwrap();
/// assert_eq!(business_date(now, offset).to_string(), "2026-03-14");
/// ```
pub fn business_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_can_be_moved() {
        let start = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);

        let later = start + chrono::Duration::hours(30);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_business_date_at_utc() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(business_date(now, utc), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }
}
