//! Air-Quality Thresholds
//!
//! Default cut points for mapping the inverted 10-bit sensor value onto the
//! six air-quality categories. A reading is assigned the first category
//! whose threshold it strictly exceeds, starting from `POOR`.

/// Readings above this are `Poor`.
pub const DEFAULT_THRESHOLD_POOR: u16 = 500;

/// Readings above this (and not above `POOR`) are `Inferior`.
pub const DEFAULT_THRESHOLD_INFERIOR: u16 = 450;

/// Readings above this (and not above `INFERIOR`) are `Fair`.
pub const DEFAULT_THRESHOLD_FAIR: u16 = 400;

/// Readings above this (and not above `FAIR`) are `Good`.
pub const DEFAULT_THRESHOLD_GOOD: u16 = 300;

/// Readings above this (and not above `GOOD`) are `Excellent`.
///
/// Anything at or below it is reported as `Unknown`: the element is cold or
/// disconnected rather than sitting in clean air.
pub const DEFAULT_THRESHOLD_EXCELLENT: u16 = 250;
