//! Poll state and change detection
//!
//! The monitor is the piece of state the sense-and-publish loop carries
//! between ticks: the category currently published, the last raw value and
//! a few counters. Each tick either records a value or a failure.
//!
//! A failed transfer never changes the published category. The previous
//! value stays visible to readers until a good sample replaces it.
//!
//! ```rust
//! use odorsense_core::{AirQuality, AirQualityMonitor, FixedTime, Thresholds};
//!
//! let mut monitor = AirQualityMonitor::new(Thresholds::default(), FixedTime::new(0))
//!     .with_notify_on_change(true);
//!
//! let update = monitor.record(420);
//! assert_eq!(update.quality, AirQuality::Fair);
//! assert!(update.notify);
//!
//! // Same category again: nothing to announce
//! assert!(!monitor.record(430).notify);
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::driver::Tgs2450;
use crate::errors::SenseError;
use crate::quality::{AirQuality, Thresholds};
use crate::time::{TimeSource, Timestamp};

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Outcome of recording one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    /// Sensor value as decoded from the ADC
    pub value: u16,
    /// Category of this sample
    pub quality: AirQuality,
    /// Category published before this sample
    pub previous: AirQuality,
    /// Category differs from the previous one
    pub changed: bool,
    /// Subscribers should be told about this sample
    pub notify: bool,
    /// When the sample was recorded
    pub timestamp: Timestamp,
}

/// Counters since the monitor was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Samples recorded
    pub samples: u64,
    /// Polls that produced no sample
    pub failures: u64,
    /// Category changes observed
    pub changes: u64,
    /// Most recent failure, if any
    pub last_error: Option<SenseError>,
}

/// Tracks the published air-quality category across polls
#[derive(Debug, Clone)]
pub struct AirQualityMonitor<T: TimeSource> {
    thresholds: Thresholds,
    notify_on_change: bool,
    current: AirQuality,
    last_value: Option<u16>,
    last_update: Option<Timestamp>,
    stats: MonitorStats,
    time: T,
}

impl<T: TimeSource> AirQualityMonitor<T> {
    /// Start at `Unknown` with change notifications off
    pub fn new(thresholds: Thresholds, time: T) -> Self {
        Self {
            thresholds,
            notify_on_change: false,
            current: AirQuality::Unknown,
            last_value: None,
            last_update: None,
            stats: MonitorStats::default(),
            time,
        }
    }

    /// Flag category changes for notification
    pub fn with_notify_on_change(mut self, enabled: bool) -> Self {
        self.notify_on_change = enabled;
        self
    }

    /// Cut points used by [`record`](Self::record)
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Whether category changes ask for a notification
    pub fn notify_on_change(&self) -> bool {
        self.notify_on_change
    }

    /// Category currently published
    pub fn current(&self) -> AirQuality {
        self.current
    }

    /// Last successfully decoded sensor value
    pub fn last_value(&self) -> Option<u16> {
        self.last_value
    }

    /// When the last sample was recorded
    pub fn last_update(&self) -> Option<Timestamp> {
        self.last_update
    }

    /// Counters so far
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Classify a value and make it the published category
    pub fn record(&mut self, value: u16) -> Update {
        let quality = self.thresholds.classify(value);
        let previous = self.current;
        let changed = quality != previous;
        let timestamp = self.time.now();

        self.current = quality;
        self.last_value = Some(value);
        self.last_update = Some(timestamp);
        self.stats.samples += 1;
        if changed {
            self.stats.changes += 1;
        }

        log_debug!("sensor value: {} ({})", value, quality);

        Update {
            value,
            quality,
            previous,
            changed,
            notify: changed && self.notify_on_change,
            timestamp,
        }
    }

    /// Count a poll that produced no sample; the published category is kept
    pub fn record_failure(&mut self, err: SenseError) {
        self.stats.failures += 1;
        self.stats.last_error = Some(err);
    }

    /// Run one driver cycle and record its outcome
    ///
    /// Errors are logged and swallowed; `None` means this tick produced no
    /// sample.
    pub fn poll<SPI, EN, HT, D>(
        &mut self,
        driver: &mut Tgs2450<SPI, EN, HT>,
        delay: &mut D,
    ) -> Option<Update>
    where
        SPI: SpiDevice,
        EN: OutputPin,
        HT: OutputPin,
        D: DelayNs,
    {
        match driver.cycle(delay) {
            Ok(value) => Some(self.record(value)),
            Err(err) => {
                log_warn!("measurement failed, keeping {}: {}", self.current, err);
                self.record_failure(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedTime;
    use embedded_hal::spi::ErrorKind;

    fn monitor(notify: bool) -> AirQualityMonitor<FixedTime> {
        AirQualityMonitor::new(Thresholds::default(), FixedTime::new(1000))
            .with_notify_on_change(notify)
    }

    #[test]
    fn starts_unknown() {
        let m = monitor(true);
        assert_eq!(m.current(), AirQuality::Unknown);
        assert_eq!(m.last_value(), None);
        assert_eq!(m.last_update(), None);
    }

    #[test]
    fn notifies_only_on_change() {
        let mut m = monitor(true);

        let first = m.record(520);
        assert_eq!(first.previous, AirQuality::Unknown);
        assert_eq!(first.quality, AirQuality::Poor);
        assert!(first.changed && first.notify);

        let second = m.record(600);
        assert!(!second.changed && !second.notify);

        let third = m.record(320);
        assert_eq!(third.previous, AirQuality::Poor);
        assert_eq!(third.quality, AirQuality::Good);
        assert!(third.notify);

        assert_eq!(m.stats().samples, 3);
        assert_eq!(m.stats().changes, 2);
    }

    #[test]
    fn low_reading_from_start_is_not_a_change() {
        let mut m = monitor(true);
        let update = m.record(100);
        assert_eq!(update.quality, AirQuality::Unknown);
        assert!(!update.changed);
    }

    #[test]
    fn notifications_disabled() {
        let mut m = monitor(false);
        let update = m.record(520);
        assert!(update.changed);
        assert!(!update.notify);
        assert_eq!(m.current(), AirQuality::Poor);
    }

    #[test]
    fn failure_keeps_category() {
        let mut m = monitor(true);
        m.record(420);
        m.record_failure(SenseError::Spi(ErrorKind::Other));

        assert_eq!(m.current(), AirQuality::Fair);
        assert_eq!(m.last_value(), Some(420));
        assert_eq!(m.stats().failures, 1);
        assert_eq!(m.stats().last_error, Some(SenseError::Spi(ErrorKind::Other)));
    }

    #[test]
    fn stamps_updates() {
        let time = FixedTime::new(5000);
        let mut m = AirQualityMonitor::new(Thresholds::default(), &time);
        m.record(300);
        time.advance(250);
        let update = m.record(300);
        assert_eq!(update.timestamp, 5250);
        assert_eq!(m.last_update(), Some(5250));
    }
}
