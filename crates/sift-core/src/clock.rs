//! Wall-clock and timezone source.
//!
//! Audit-log day keys and the retention window depend on "today" in the
//! deployment's timezone, so the clock is injected rather than ambient.

use chrono::DateTime;
use chrono_tz::Tz;

/// Local date-time source for log keys and retention decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

/// System clock rendered in a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    tz: Tz,
}

impl LocalClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for LocalClock {
    fn now(&self) -> DateTime<Tz> {
        chrono::Utc::now().with_timezone(&self.tz)
    }
}

/// Clock pinned to one instant; test double.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Tz>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}
