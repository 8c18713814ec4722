use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of submission and decision timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that advances by a fixed step on every reading, so successive submissions get
/// distinct, predictable timestamps.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// A clock frozen at `at`.
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::new(at, Duration::zero())
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = match self.next.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let current = *next;
        *next = current + self.step;
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stepping_clock_advances_per_reading() {
        let start = Utc
            .with_ymd_and_hms(2025, 11, 1, 8, 0, 0)
            .single()
            .expect("valid");
        let clock = SteppingClock::new(start, Duration::minutes(5));
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::minutes(5));

        let frozen = SteppingClock::fixed(start);
        assert_eq!(frozen.now(), frozen.now());
    }
}
