//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

/// Abstraction over game time.
///
/// Ground-item expiry and event timestamps read time through this trait so
/// tests can pin or advance it explicitly.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
