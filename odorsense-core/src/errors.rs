//! Error Types for Sensing and Configuration Failures
//!
//! ## Design
//!
//! Errors are returned from the poll path every 250 ms and may be logged
//! from `no_std` targets, so they follow the same rules everywhere:
//!
//! 1. **Copy**: every variant is plain data. Bus errors are reduced to the
//!    `embedded-hal` [`ErrorKind`](embedded_hal::spi::ErrorKind) of the
//!    failing peripheral instead of carrying the driver's own error type.
//! 2. **No heap**: messages are `&'static str`.
//!
//! ## Categories
//!
//! ### Sensing ([`SenseError`])
//! - `Spi`: the ADC transfer failed. The poll loop logs it and keeps the
//!   previous air-quality category.
//! - `Gpio`: the heater or sample-enable line could not be driven.
//!
//! ### Configuration ([`ConfigError`])
//! - `InvalidThresholds`: thresholds are not strictly descending or exceed
//!   the ADC range.
//! - `InvalidPin`: a configured header pin is not GPIO-capable, or both
//!   lines share one pin.
//! - `InvalidTiming` / `InvalidValue`: zero intervals, clocks, or malformed
//!   configuration documents.
//!
//! ```rust
//! use odorsense_core::{SenseError, Thresholds};
//!
//! fn handle(result: Result<u16, SenseError>, thresholds: &Thresholds) {
//!     match result {
//!         Ok(value) => {
//!             let _quality = thresholds.classify(value);
//!         }
//!         Err(SenseError::Spi(_)) => {
//!             // keep publishing the previous category
//!         }
//!         Err(SenseError::Gpio(_)) => {
//!             // heater state unknown, readings will drift
//!         }
//!     }
//! }
//! ```

use embedded_hal::{digital, spi};
use thiserror_no_std::Error;

/// Result type for sensing operations
pub type SenseResult<T> = Result<T, SenseError>;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures on the sensor's buses
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenseError {
    /// SPI transfer to the ADC failed
    #[error("SPI transfer failed: {0:?}")]
    Spi(spi::ErrorKind),

    /// Driving the heater or sample-enable line failed
    #[error("GPIO write failed: {0:?}")]
    Gpio(digital::ErrorKind),
}

impl SenseError {
    /// Reduce a SPI driver error to its kind
    pub fn spi<E: spi::Error>(err: E) -> Self {
        Self::Spi(err.kind())
    }

    /// Reduce a GPIO driver error to its kind
    pub fn gpio<E: digital::Error>(err: E) -> Self {
        Self::Gpio(err.kind())
    }
}

/// Rejected configuration values
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Thresholds out of order or out of range
    #[error("Invalid thresholds: {reason}")]
    InvalidThresholds {
        /// What is wrong
        reason: &'static str,
    },

    /// Header pin cannot be used as a GPIO output
    #[error("Invalid pin {pin}: {reason}")]
    InvalidPin {
        /// Physical header pin number as configured
        pin: u8,
        /// Why the pin was rejected
        reason: &'static str,
    },

    /// Poll interval, clock or pulse width is unusable
    #[error("Invalid timing: {reason}")]
    InvalidTiming {
        /// What is wrong
        reason: &'static str,
    },

    /// Configuration document could not be interpreted
    #[error("Invalid configuration: {reason}")]
    InvalidValue {
        /// What is wrong
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SenseError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Spi(kind) =>
                defmt::write!(fmt, "SPI transfer failed: {}", defmt::Debug2Format(kind)),
            Self::Gpio(kind) =>
                defmt::write!(fmt, "GPIO write failed: {}", defmt::Debug2Format(kind)),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidThresholds { reason } =>
                defmt::write!(fmt, "Invalid thresholds: {}", reason),
            Self::InvalidPin { pin, reason } =>
                defmt::write!(fmt, "Invalid pin {}: {}", pin, reason),
            Self::InvalidTiming { reason } =>
                defmt::write!(fmt, "Invalid timing: {}", reason),
            Self::InvalidValue { reason } =>
                defmt::write!(fmt, "Invalid configuration: {}", reason),
        }
    }
}
