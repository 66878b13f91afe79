//! System clock adapter

use chrono::{DateTime, Utc};
use jimeng_application::ports::Clock;

/// Clock reading the system time, used to stamp history records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_follow_system_time() {
        let clock = SystemClock::new();
        let before = Utc::now().timestamp_millis();
        let now = clock.now_millis();
        assert!(now >= before);
    }
}
