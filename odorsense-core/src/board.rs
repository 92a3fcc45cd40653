//! Raspberry Pi 40-pin header map
//!
//! Wiring is configured in physical header numbers (the numbers printed on
//! the board's silkscreen), while the GPIO character device addresses lines
//! by BCM offset. This module converts between the two and rejects pins
//! that cannot drive the heater or sample-enable line.

use crate::errors::{ConfigError, ConfigResult};

/// Number of pins on the header
pub const HEADER_PINS: u8 = 40;

/// (physical pin, BCM line) for every GPIO-capable header pin
const HEADER_TO_BCM: [(u8, u8); 28] = [
    (3, 2), (5, 3), (7, 4), (8, 14), (10, 15), (11, 17), (12, 18),
    (13, 27), (15, 22), (16, 23), (18, 24), (19, 10), (21, 9), (22, 25),
    (23, 11), (24, 8), (26, 7), (27, 0), (28, 1), (29, 5), (31, 6),
    (32, 12), (33, 13), (35, 19), (36, 16), (37, 26), (38, 20), (40, 21),
];

/// Header pins claimed by SPI0 (MOSI, MISO, SCLK, CE0, CE1)
pub const SPI0_PINS: [u8; 5] = [19, 21, 23, 24, 26];

/// BCM line behind a physical header pin, if it is a GPIO pin
pub fn header_to_bcm(pin: u8) -> Option<u8> {
    HEADER_TO_BCM
        .iter()
        .find(|(header, _)| *header == pin)
        .map(|(_, bcm)| *bcm)
}

/// Resolve a pin meant to be driven as an output next to the SPI0 bus
pub fn output_line(pin: u8) -> ConfigResult<u8> {
    if pin == 0 || pin > HEADER_PINS {
        return Err(ConfigError::InvalidPin { pin, reason: "not a header pin" });
    }

    if SPI0_PINS.contains(&pin) {
        return Err(ConfigError::InvalidPin { pin, reason: "reserved for the SPI bus" });
    }

    header_to_bcm(pin).ok_or(ConfigError::InvalidPin {
        pin,
        reason: "power or ground pin",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wiring() {
        assert_eq!(header_to_bcm(11), Some(17));
        assert_eq!(header_to_bcm(15), Some(22));
    }

    #[test]
    fn every_gpio_pin_resolves() {
        for (header, bcm) in HEADER_TO_BCM {
            assert_eq!(header_to_bcm(header), Some(bcm));
        }
    }

    #[test]
    fn rejects_power_ground_and_spi() {
        assert!(matches!(output_line(1), Err(ConfigError::InvalidPin { pin: 1, .. })));
        assert!(matches!(output_line(6), Err(ConfigError::InvalidPin { .. })));
        assert!(matches!(output_line(23), Err(ConfigError::InvalidPin { .. })));
        assert!(output_line(0).is_err());
        assert!(output_line(41).is_err());
        assert_eq!(output_line(15), Ok(22));
    }
}
