//! Time-Related Constants
//!
//! Poll cadence and pulse widths for the TGS2450 measurement cycle.

// ===== SAMPLING INTERVALS =====

/// Default poll interval (milliseconds).
///
/// The TGS2450 is designed around a 250 ms drive cycle: one heater pulse
/// and one sample per cycle.
///
/// Source: Figaro TGS2450 datasheet, circuit & operating conditions
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// ===== PULSE TIMING =====

/// Delay between raising the sample-enable line and reading the ADC (milliseconds).
///
/// Lets the load-resistor voltage settle before conversion.
pub const SENSOR_SETTLE_MS: u32 = 3;

/// Heater pulse width (milliseconds).
///
/// 8 ms on per 250 ms cycle keeps the element at operating temperature.
///
/// Source: Figaro TGS2450 datasheet
pub const HEATER_PULSE_MS: u32 = 8;
