//! Constants for odorsense Core
//!
//! Centralized numeric values for the sensing loop. Every magic number the
//! driver, classifier or configuration layer relies on lives here with a
//! note on where it comes from.
//!
//! ## Organization
//!
//! - **Sensors**: ADC command bits and sensor/board defaults
//! - **Time**: Poll cadence and the heater/enable pulse timing
//! - **Quality**: Default air-quality classification thresholds

/// Sensor and ADC specifications: command bits, resolution, default wiring.
pub mod sensors;

/// Poll interval and GPIO pulse timing.
pub mod time;

/// Default classification thresholds.
pub mod quality;

pub use sensors::{
    COMMAND_START, COMMAND_SGL, COMMAND_MSBF, COMMAND_DUMMY,
    ADC_MAX_VALUE, DEFAULT_SPI_DEVICE, DEFAULT_SPI_CLOCK_HZ,
    DEFAULT_GPIO_CHIP, DEFAULT_HEATER_PIN, DEFAULT_SENSOR_PIN,
};

pub use time::{DEFAULT_POLL_INTERVAL_MS, SENSOR_SETTLE_MS, HEATER_PULSE_MS};

pub use quality::{
    DEFAULT_THRESHOLD_POOR, DEFAULT_THRESHOLD_INFERIOR, DEFAULT_THRESHOLD_FAIR,
    DEFAULT_THRESHOLD_GOOD, DEFAULT_THRESHOLD_EXCELLENT,
};
