//! Core sensing engine for odorsense
//!
//! Reads a TGS2450 odor sensor through a 10-bit SPI ADC, pulses its heater,
//! and turns each reading into one of six air-quality categories.
//! Designed to run the same on a Linux bridge and on bare metal.
//!
//! Key constraints:
//! - One sample per 250 ms cycle
//! - No heap allocation on the poll path
//! - A failed transfer never changes the published category
//!
//! ```no_run
//! use odorsense_core::{AirQualityMonitor, SystemTime, Tgs2450, Thresholds};
//! # fn run<S, E, H, D>(spi: S, enable: E, heater: H, mut delay: D)
//! # where
//! #     S: embedded_hal::spi::SpiDevice,
//! #     E: embedded_hal::digital::OutputPin,
//! #     H: embedded_hal::digital::OutputPin,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//! let mut sensor = Tgs2450::new(spi, enable, heater);
//! let mut monitor = AirQualityMonitor::new(Thresholds::default(), SystemTime)
//!     .with_notify_on_change(true);
//!
//! if let Some(update) = monitor.poll(&mut sensor, &mut delay) {
//!     if update.notify {
//!         // push update.quality to subscribers
//!     }
//! }
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod board;
pub mod constants;
pub mod driver;
pub mod errors;
pub mod frame;
pub mod monitor;
pub mod quality;
pub mod time;

#[cfg(feature = "std")]
pub mod config;

// Public API
pub use driver::{SampleTiming, Tgs2450};
pub use errors::{ConfigError, ConfigResult, SenseError, SenseResult};
pub use monitor::{AirQualityMonitor, MonitorStats, Update};
pub use quality::{AirQuality, Thresholds};
pub use time::{FixedTime, TimeSource, Timestamp};

#[cfg(feature = "std")]
pub use config::{LoadError, SensorConfig};

#[cfg(feature = "std")]
pub use time::SystemTime;

/// Crate version, reported as the accessory firmware revision
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
