//! # Session Clock
//!
//! Tracks when the current session started and when the screen-break
//! warning is due. This timestamp is the only state the client keeps
//! outside its collaborators. Pure and clock-injected; callers pass "now".

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    started_at: DateTime<Utc>,
    warn_after: TimeDelta,
}

impl SessionClock {
    pub const DEFAULT_WARN_AFTER_MINUTES: i64 = 2;

    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            warn_after: TimeDelta::minutes(Self::DEFAULT_WARN_AFTER_MINUTES),
        }
    }

    pub fn started_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn with_warn_after(mut self, warn_after: TimeDelta) -> Self {
        self.warn_after = warn_after;
        self
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether the break warning should be showing at `now`.
    pub fn warning_due(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at >= self.warn_after
    }

    /// Time left until the warning, zero once it is due.
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        std::cmp::max(TimeDelta::zero(), self.warn_after - (now - self.started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn warning_fires_exactly_at_the_interval() {
        let clock = SessionClock::new(at(12, 0, 0));
        assert!(!clock.warning_due(at(12, 1, 59)));
        assert!(clock.warning_due(at(12, 2, 0)));
    }

    #[test]
    fn remaining_counts_down_and_clamps_at_zero() {
        let clock = SessionClock::new(at(12, 0, 0));
        assert_eq!(clock.remaining(at(12, 0, 30)), TimeDelta::seconds(90));
        assert_eq!(clock.remaining(at(12, 5, 0)), TimeDelta::zero());
    }

    #[test]
    fn interval_is_configurable() {
        let clock = SessionClock::new(at(12, 0, 0)).with_warn_after(TimeDelta::minutes(10));
        assert!(!clock.warning_due(at(12, 5, 0)));
        assert!(clock.warning_due(at(12, 10, 0)));
    }
}
