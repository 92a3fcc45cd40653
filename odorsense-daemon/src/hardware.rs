//! Linux SPI and GPIO character-device access

use anyhow::{anyhow, Context, Result};
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use odorsense_core::{SampleTiming, SensorConfig, Tgs2450};

/// Consumer label shown by `gpioinfo`
const CONSUMER: &str = "odorsense";

/// Driver wired to real Linux peripherals
pub type LinuxSensor = Tgs2450<SpidevDevice, CdevPin, CdevPin>;

/// Open the SPI device in mode 0 at the configured clock
pub fn open_spi(path: &str, clock_hz: u32) -> Result<SpidevDevice> {
    let mut spi = SpidevDevice::open(path).map_err(|e| anyhow!("opening {path}: {e:?}"))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(clock_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.0
        .configure(&options)
        .with_context(|| format!("configuring {path}"))?;
    Ok(spi)
}

/// Request `line` on `chip` as an output, initially low
pub fn output_pin(chip: &mut Chip, line: u8) -> Result<CdevPin> {
    let handle = chip
        .get_line(u32::from(line))
        .and_then(|l| l.request(LineRequestFlags::OUTPUT, 0, CONSUMER))
        .with_context(|| format!("requesting GPIO line {line}"))?;
    CdevPin::new(handle).map_err(|e| anyhow!("GPIO line {line}: {e:?}"))
}

/// Open every peripheral named by `config` and build the driver
pub fn open_sensor(config: &SensorConfig) -> Result<LinuxSensor> {
    let heater_line = config.heater_line()?;
    let sensor_line = config.sensor_line()?;

    let spi = open_spi(&config.spi_device, config.spi_clock_hz)?;
    let mut chip =
        Chip::new(&config.gpio_chip).with_context(|| format!("opening {}", config.gpio_chip))?;
    let sensor_pin = output_pin(&mut chip, sensor_line)?;
    let heater_pin = output_pin(&mut chip, heater_line)?;

    tracing::info!(
        spi = %config.spi_device,
        clock_hz = config.spi_clock_hz,
        heater = config.heater_pin,
        heater_line,
        sensor = config.sensor_pin,
        sensor_line,
        "sensor hardware opened"
    );

    Ok(Tgs2450::new(spi, sensor_pin, heater_pin).with_timing(SampleTiming::default()))
}

/// Blocking delay backed by the OS
pub fn delay() -> Delay {
    Delay
}
