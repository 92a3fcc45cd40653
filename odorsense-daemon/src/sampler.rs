//! One tick of the sense-and-publish loop

use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use odorsense_connectors::AirQualityAccessory;
use odorsense_core::{AirQualityMonitor, MonitorStats, TimeSource, Tgs2450, Update};

/// Owns the sensor and pushes each sample into the accessory
pub struct Sampler<SPI, EN, HT, D, T: TimeSource> {
    driver: Tgs2450<SPI, EN, HT>,
    delay: D,
    monitor: AirQualityMonitor<T>,
    accessory: Arc<AirQualityAccessory>,
}

impl<SPI, EN, HT, D, T> Sampler<SPI, EN, HT, D, T>
where
    SPI: SpiDevice,
    EN: OutputPin,
    HT: OutputPin,
    D: DelayNs,
    T: TimeSource,
{
    pub fn new(
        driver: Tgs2450<SPI, EN, HT>,
        delay: D,
        monitor: AirQualityMonitor<T>,
        accessory: Arc<AirQualityAccessory>,
    ) -> Self {
        Self {
            driver,
            delay,
            monitor,
            accessory,
        }
    }

    pub fn accessory(&self) -> &Arc<AirQualityAccessory> {
        &self.accessory
    }

    pub fn stats(&self) -> MonitorStats {
        self.monitor.stats()
    }

    /// Sample once and store the result on the accessory
    ///
    /// Notifies subscribers only when the monitor asks for it. A failed
    /// cycle leaves the accessory untouched.
    pub fn tick(&mut self) -> Option<Update> {
        let update = self.monitor.poll(&mut self.driver, &mut self.delay)?;
        if update.notify {
            self.accessory.notify(update.quality);
        } else {
            self.accessory.update(update.quality);
        }
        Some(update)
    }

    /// Drive both lines low and hand back the peripherals
    pub fn shutdown(mut self) -> (SPI, EN, HT) {
        if let Err(err) = self.driver.power_down() {
            log::warn!("could not drive sensor lines low: {}", err);
        }
        self.driver.release()
    }
}
