//! TGS2450 odor sensor driver
//!
//! The TGS2450 needs two digital lines besides the ADC:
//! - **sample-enable**: powers the load circuit while the ADC converts
//! - **heater**: short pulse once per cycle to keep the element hot
//!
//! One measurement cycle:
//!
//! ```text
//! enable  ___/‾‾‾‾‾‾‾‾‾‾‾‾\________________
//! SPI     ________[xfer]___________________
//! heater  ________________/‾‾‾‾‾‾‾‾\_______
//!            |<-3ms->|       |<-8ms->|
//! ```
//!
//! The driver is generic over `embedded-hal` 1.0 traits so it runs against
//! spidev/gpio-cdev on Linux and against mocks in tests.
//!
//! ```rust
//! use embedded_hal_mock::eh1::delay::NoopDelay;
//! use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
//! use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
//! use odorsense_core::Tgs2450;
//!
//! let spi = SpiMock::new(&[
//!     SpiTransaction::transaction_start(),
//!     SpiTransaction::transfer_in_place(vec![0x6F, 0xFF], vec![0x02, 0x00]),
//!     SpiTransaction::transaction_end(),
//! ]);
//! let enable = PinMock::new(&[
//!     PinTransaction::set(State::Low),
//!     PinTransaction::set(State::High),
//!     PinTransaction::set(State::Low),
//! ]);
//! let heater = PinMock::new(&[
//!     PinTransaction::set(State::Low),
//!     PinTransaction::set(State::High),
//!     PinTransaction::set(State::Low),
//! ]);
//!
//! let mut sensor = Tgs2450::new(spi, enable, heater);
//! let value = sensor.cycle(&mut NoopDelay::new()).unwrap();
//! assert_eq!(value, 1023 - 512);
//!
//! let (mut spi, mut enable, mut heater) = sensor.release();
//! spi.done();
//! enable.done();
//! heater.done();
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::constants::time::{HEATER_PULSE_MS, SENSOR_SETTLE_MS};
use crate::errors::{SenseError, SenseResult};
use crate::frame;

/// Pulse widths of one measurement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTiming {
    /// Enable-to-conversion delay in milliseconds
    pub settle_ms: u32,
    /// Heater on-time in milliseconds
    pub heater_pulse_ms: u32,
}

impl Default for SampleTiming {
    fn default() -> Self {
        Self {
            settle_ms: SENSOR_SETTLE_MS,
            heater_pulse_ms: HEATER_PULSE_MS,
        }
    }
}

/// TGS2450 behind a SPI ADC with heater and sample-enable lines
#[derive(Debug)]
pub struct Tgs2450<SPI, EN, HT> {
    spi: SPI,
    sensor_pin: EN,
    heater_pin: HT,
    timing: SampleTiming,
    initialized: bool,
}

impl<SPI, EN, HT> Tgs2450<SPI, EN, HT>
where
    SPI: SpiDevice,
    EN: OutputPin,
    HT: OutputPin,
{
    /// Wrap the bus and both lines. Nothing is driven until the first cycle.
    pub fn new(spi: SPI, sensor_pin: EN, heater_pin: HT) -> Self {
        Self {
            spi,
            sensor_pin,
            heater_pin,
            timing: SampleTiming::default(),
            initialized: false,
        }
    }

    /// Override the pulse widths
    pub fn with_timing(mut self, timing: SampleTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Whether both lines have been driven to their idle state
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drive both lines low. Runs once, on the first cycle, unless called earlier.
    pub fn init(&mut self) -> SenseResult<()> {
        self.sensor_pin.set_low().map_err(SenseError::gpio)?;
        self.heater_pin.set_low().map_err(SenseError::gpio)?;
        self.initialized = true;
        Ok(())
    }

    /// Single ADC conversion, without touching the GPIO lines
    pub fn read_raw(&mut self) -> SenseResult<u16> {
        let mut buf = frame::command_frame();
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(SenseError::spi)?;
        Ok(frame::decode(buf))
    }

    /// One full measurement cycle
    ///
    /// A failed transfer still releases the enable line and fires the heater
    /// pulse before the error is returned, so the element stays on its duty
    /// cycle while the bus misbehaves.
    pub fn cycle<D: DelayNs>(&mut self, delay: &mut D) -> SenseResult<u16> {
        if !self.initialized {
            self.init()?;
        }

        self.sensor_pin.set_high().map_err(SenseError::gpio)?;
        delay.delay_ms(self.timing.settle_ms);
        let reading = self.read_raw();
        self.sensor_pin.set_low().map_err(SenseError::gpio)?;

        self.heater_pin.set_high().map_err(SenseError::gpio)?;
        delay.delay_ms(self.timing.heater_pulse_ms);
        self.heater_pin.set_low().map_err(SenseError::gpio)?;

        reading
    }

    /// Drive both lines low without giving up the peripherals
    pub fn power_down(&mut self) -> SenseResult<()> {
        let sensor = self.sensor_pin.set_low().map_err(SenseError::gpio);
        let heater = self.heater_pin.set_low().map_err(SenseError::gpio);
        sensor.and(heater)
    }

    /// Give back the bus and both lines
    pub fn release(self) -> (SPI, EN, HT) {
        (self.spi, self.sensor_pin, self.heater_pin)
    }
}
