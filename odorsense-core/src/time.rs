//! Time sources for stamping readings
//!
//! The monitor records when the last sample arrived. Which clock that is
//! depends on the target:
//! - System clock (Linux daemon)
//! - Fixed clock (tests)

/// Timestamp in milliseconds since epoch
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: core::cell::Cell<Timestamp>,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: core::cell::Cell::new(timestamp) }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get() + ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}
