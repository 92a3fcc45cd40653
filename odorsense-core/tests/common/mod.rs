//! Shared test doubles for the sensing integration tests
//!
//! - `RecordingDelay`: remembers every requested delay
//! - `FailingSpi`: a bus whose every transfer fails
//! - helpers for building mock pins and bus transactions

#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind, ErrorType, Operation, SpiDevice};
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;

/// Delay that records requested milliseconds instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub delays_ms: Vec<u32>,
    pub other_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.other_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

/// SPI error returned by [`FailingSpi`]
#[derive(Debug, Clone, Copy)]
pub struct BusFault;

impl spi::Error for BusFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ModeFault
    }
}

/// SPI device whose every transaction fails
#[derive(Debug, Default)]
pub struct FailingSpi {
    pub attempts: usize,
}

impl ErrorType for FailingSpi {
    type Error = BusFault;
}

impl SpiDevice for FailingSpi {
    fn transaction(&mut self, _operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.attempts += 1;
        Err(BusFault)
    }
}

/// Bus expectations for `n` conversions answering `responses` in order
pub fn conversions(responses: &[[u8; 2]]) -> Vec<SpiTransaction<u8>> {
    responses
        .iter()
        .flat_map(|response| {
            [
                SpiTransaction::transaction_start(),
                SpiTransaction::transfer_in_place(vec![0x6F, 0xFF], response.to_vec()),
                SpiTransaction::transaction_end(),
            ]
        })
        .collect()
}

/// Line expectations: driven low once at init, then one high/low pulse per cycle
pub fn pulsed_line(cycles: usize) -> PinMock {
    let mut expectations = vec![PinTransaction::set(State::Low)];
    for _ in 0..cycles {
        expectations.push(PinTransaction::set(State::High));
        expectations.push(PinTransaction::set(State::Low));
    }
    PinMock::new(&expectations)
}

/// ADC response encoding a sensor value
pub fn response_for(value: u16) -> [u8; 2] {
    let raw = 1023 - value;
    [(raw >> 8) as u8 & 0x03, (raw & 0xFF) as u8]
}

/// GPIO error returned by [`StuckPin`]
#[derive(Debug, Clone, Copy)]
pub struct LineFault;

impl digital::Error for LineFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Output line that refuses every write
#[derive(Debug, Default)]
pub struct StuckPin;

impl digital::ErrorType for StuckPin {
    type Error = LineFault;
}

impl OutputPin for StuckPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(LineFault)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(LineFault)
    }
}
