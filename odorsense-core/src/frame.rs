//! SPI wire format for the sensor's ADC
//!
//! One conversion is a single two-byte full-duplex transfer:
//!
//! ```text
//! MOSI: [ START | SGL | MSBF ] [ DUMMY ]
//! MISO: [ xxxx xx B9 B8      ] [ B7..B0 ]
//! ```
//!
//! Only the two low bits of the first response byte belong to the result.

use crate::constants::sensors::{
    ADC_HIGH_BITS_MASK, ADC_MAX_VALUE, COMMAND_DUMMY, COMMAND_MSBF, COMMAND_SGL, COMMAND_START,
};

/// Length of one transfer in bytes
pub const FRAME_LEN: usize = 2;

/// Command byte sent on every conversion
pub const COMMAND_BYTE: u8 = COMMAND_START | COMMAND_SGL | COMMAND_MSBF;

/// Bytes clocked out to request one conversion
pub const fn command_frame() -> [u8; FRAME_LEN] {
    [COMMAND_BYTE, COMMAND_DUMMY]
}

/// Raw 10-bit conversion result carried in a response
pub const fn raw_count(response: [u8; FRAME_LEN]) -> u16 {
    (((response[0] & ADC_HIGH_BITS_MASK) as u16) << 8) + response[1] as u16
}

/// Sensor value from a response: the conversion result inverted against
/// the 10-bit ceiling, always in `0..=1023`
pub const fn decode(response: [u8; FRAME_LEN]) -> u16 {
    ADC_MAX_VALUE - raw_count(response)
}
