use chrono::{DateTime, Duration, DurationRound, RoundingError, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Start of the hour containing `t`
pub fn truncate_to_hour(t: DateTime<Utc>) -> Result<DateTime<Utc>, RoundingError> {
    t.duration_trunc(Duration::hours(1))
}

/// Start of the minute containing `t`
pub fn truncate_to_minute(t: DateTime<Utc>) -> Result<DateTime<Utc>, RoundingError> {
    t.duration_trunc(Duration::minutes(1))
}
