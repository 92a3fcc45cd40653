//! Sensor and ADC Specifications
//!
//! The TGS2450 is an analog part. Its load-resistor voltage is sampled by a
//! 10-bit MCP3002-class SPI ADC, so everything the driver sends or receives
//! on the bus is defined by the ADC's command byte.

// ===== ADC COMMAND BITS =====

/// Start bit plus the fixed low bits of the command byte.
///
/// Always set; the ADC ignores clocks until it sees the leading one.
pub const COMMAND_START: u8 = 0x47;

/// Single-ended input select.
///
/// Selects single-ended conversion instead of pseudo-differential.
pub const COMMAND_SGL: u8 = 0x20;

/// MSB-first output format.
///
/// Without it the ADC repeats the sample LSB-first after the MSB-first word.
pub const COMMAND_MSBF: u8 = 0x08;

/// Filler byte clocked out while the conversion result is clocked in.
pub const COMMAND_DUMMY: u8 = 0xFF;

// ===== ADC RESOLUTION =====

/// Largest conversion result of the 10-bit ADC.
///
/// The sensor value is reported inverted against this ceiling, so a higher
/// value means more reducing gas on the sensing element.
pub const ADC_MAX_VALUE: u16 = 1023;

/// Mask for the two result bits carried in the first response byte.
pub const ADC_HIGH_BITS_MASK: u8 = 0x03;

// ===== BUS DEFAULTS =====

/// Default spidev node (bus 0, chip-select 0 on a Raspberry Pi).
pub const DEFAULT_SPI_DEVICE: &str = "/dev/spidev0.0";

/// Default SPI clock (1 MHz).
///
/// Well inside the ADC's 1.2 MHz limit at 2.7 V supply.
pub const DEFAULT_SPI_CLOCK_HZ: u32 = 1_000_000;

/// Default GPIO character device.
pub const DEFAULT_GPIO_CHIP: &str = "/dev/gpiochip0";

// ===== WIRING DEFAULTS =====

/// Default heater line, physical header pin 11 (BCM 17).
pub const DEFAULT_HEATER_PIN: u8 = 11;

/// Default sample-enable line, physical header pin 15 (BCM 22).
pub const DEFAULT_SENSOR_PIN: u8 = 15;
