//! Clock abstraction for time-of-day dependent logic.
//!
//! Persona scheduling branches on wall-clock time, so the clock is injected
//! rather than read ambiently. This keeps window tests deterministic and
//! independent of the host time zone.

use chrono::{DateTime, FixedOffset, Utc};

/// A source of "now" in a configured time zone.
pub trait Clock: Send + Sync {
    /// Returns the current instant in the clock's configured zone.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The real wall clock, shifted into a fixed UTC offset.
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Creates a system clock for the given zone offset.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Creates a system clock in UTC.
    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0).unwrap(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// A clock frozen at a preset instant, for tests.
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    /// Creates a clock that always reports `instant`.
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Convenience constructor from an RFC 3339 string.
    ///
    /// # Panics
    ///
    /// Panics if the string is not valid RFC 3339 (test helper).
    pub fn at(rfc3339: &str) -> Self {
        Self::new(
            DateTime::parse_from_rfc3339(rfc3339).expect("FixedClock::at requires valid RFC 3339"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}
