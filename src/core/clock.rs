//! Wall-clock source for the timer and the weekly window.

use crate::utils::time::truncate_to_millis;
use chrono::{Duration, Local, NaiveDateTime};
use std::sync::{Arc, Mutex, PoisonError};

pub trait Clock: Send + Sync + 'static {
    /// Current local wall-clock time, millisecond precision.
    fn now(&self) -> NaiveDateTime;
}

/// Production clock backed by the system's local time.
///
/// Readings carry no UTC offset. A shift that spans a daylight-saving
/// change is measured in wall-clock terms: across spring-forward it gains
/// the skipped hour, and across fall-back an end that reads earlier than
/// the start is clamped to a zero-length shift.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_millis(Local::now().naive_local())
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(truncate_to_millis(start))),
        }
    }

    pub fn set(&self, t: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = truncate_to_millis(t);
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn manual_clock_moves_only_on_demand() {
        let t0 = NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let clock = ManualClock::new(t0);
        let shared = clock.clone();
        assert_eq!(clock.now(), t0);

        shared.advance(Duration::seconds(1));
        assert_eq!(clock.now(), t0 + Duration::seconds(1));
    }

    #[test]
    fn system_clock_has_millisecond_precision() {
        assert_eq!(SystemClock.now().nanosecond() % 1_000_000, 0);
    }
}
