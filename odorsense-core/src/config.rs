//! Accessory configuration
//!
//! The accessory is configured by a JSON block in the bridge's config file.
//! Keys are camelCase and everything except `name` has a default:
//!
//! ```json
//! {
//!   "accessory": "OderSensor",
//!   "name": "Kitchen Odor",
//!   "heaterPin": 11,
//!   "sensorPin": 15,
//!   "notifyOnChange": true,
//!   "poor": 500, "inferior": 450, "fair": 400, "good": 300, "excellent": 250
//! }
//! ```
//!
//! [`SensorConfig::from_file`] accepts either that block on its own or a full
//! bridge config carrying it in an `accessories` array.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror_no_std::Error;

use crate::board;
use crate::constants::sensors::{
    DEFAULT_GPIO_CHIP, DEFAULT_HEATER_PIN, DEFAULT_SENSOR_PIN, DEFAULT_SPI_CLOCK_HZ,
    DEFAULT_SPI_DEVICE,
};
use crate::constants::time::DEFAULT_POLL_INTERVAL_MS;
use crate::errors::{ConfigError, ConfigResult};
use crate::quality::Thresholds;

/// Accessory identifier this crate registers under
pub const ACCESSORY_ID: &str = "OderSensor";

/// Fastest poll interval accepted (milliseconds)
///
/// One cycle takes settle + heater pulse plus the transfer, so anything
/// shorter would overlap itself.
pub const MIN_POLL_INTERVAL_MS: u64 = 20;

/// Failures while loading a configuration document
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No OderSensor accessory in config")]
    NotFound,

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Settings for one sensor accessory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConfig {
    /// Accessory identifier, always [`ACCESSORY_ID`]
    #[serde(default = "default_accessory")]
    pub accessory: String,

    /// Display name of the accessory
    pub name: String,

    /// spidev node of the ADC
    #[serde(default = "default_spi_device")]
    pub spi_device: String,

    /// SPI clock in Hz
    #[serde(default = "default_spi_clock_hz")]
    pub spi_clock_hz: u32,

    /// GPIO character device
    #[serde(default = "default_gpio_chip")]
    pub gpio_chip: String,

    /// Heater line, physical header pin
    #[serde(default = "default_heater_pin")]
    pub heater_pin: u8,

    /// Sample-enable line, physical header pin
    #[serde(default = "default_sensor_pin")]
    pub sensor_pin: u8,

    /// Time between measurement cycles (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Push a notification when the category changes
    #[serde(default = "default_notify_on_change")]
    pub notify_on_change: bool,

    /// Classification cut points, flattened into the block
    #[serde(flatten)]
    pub thresholds: Thresholds,
}

fn default_accessory() -> String {
    ACCESSORY_ID.to_string()
}

fn default_spi_device() -> String {
    DEFAULT_SPI_DEVICE.to_string()
}

fn default_spi_clock_hz() -> u32 {
    DEFAULT_SPI_CLOCK_HZ
}

fn default_gpio_chip() -> String {
    DEFAULT_GPIO_CHIP.to_string()
}

fn default_heater_pin() -> u8 {
    DEFAULT_HEATER_PIN
}

fn default_sensor_pin() -> u8 {
    DEFAULT_SENSOR_PIN
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_notify_on_change() -> bool {
    true
}

impl SensorConfig {
    /// Defaults for everything but the name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            accessory: default_accessory(),
            name: name.into(),
            spi_device: default_spi_device(),
            spi_clock_hz: default_spi_clock_hz(),
            gpio_chip: default_gpio_chip(),
            heater_pin: default_heater_pin(),
            sensor_pin: default_sensor_pin(),
            poll_interval_ms: default_poll_interval_ms(),
            notify_on_change: default_notify_on_change(),
            thresholds: Thresholds::default(),
        }
    }

    /// Parse and validate an accessory block or full bridge config
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn from_value(value: Value) -> Result<Self, LoadError> {
        let block = match value.get("accessories").cloned() {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .find(|entry| entry.get("accessory").and_then(Value::as_str) == Some(ACCESSORY_ID))
                .ok_or(LoadError::NotFound)?,
            Some(_) => {
                return Err(ConfigError::InvalidValue { reason: "accessories must be an array" }.into())
            }
            None => value,
        };

        let config: SensorConfig = serde_json::from_value(block)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that would otherwise fail at runtime
    pub fn validate(&self) -> ConfigResult<()> {
        if self.accessory != ACCESSORY_ID {
            return Err(ConfigError::InvalidValue { reason: "accessory must be OderSensor" });
        }

        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue { reason: "name must not be empty" });
        }

        self.thresholds.validate()?;

        self.heater_line()?;
        self.sensor_line()?;
        if self.heater_pin == self.sensor_pin {
            return Err(ConfigError::InvalidPin {
                pin: self.heater_pin,
                reason: "heater and sensor lines share a pin",
            });
        }

        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(ConfigError::InvalidTiming {
                reason: "poll interval shorter than one measurement cycle",
            });
        }

        if self.spi_clock_hz == 0 {
            return Err(ConfigError::InvalidTiming { reason: "SPI clock must be non-zero" });
        }

        Ok(())
    }

    /// BCM line of the heater pin
    pub fn heater_line(&self) -> ConfigResult<u8> {
        board::output_line(self.heater_pin)
    }

    /// BCM line of the sample-enable pin
    pub fn sensor_line(&self) -> ConfigResult<u8> {
        board::output_line(self.sensor_pin)
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_block_gets_defaults() {
        let config = SensorConfig::from_json_str(r#"{"name": "Odor"}"#).unwrap();
        assert_eq!(config, SensorConfig::new("Odor"));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.heater_line(), Ok(17));
        assert_eq!(config.sensor_line(), Ok(22));
    }

    #[test]
    fn camel_case_keys() {
        let config = SensorConfig::from_json_str(
            r#"{
                "accessory": "OderSensor",
                "name": "Odor",
                "heaterPin": 16,
                "sensorPin": 18,
                "pollIntervalMs": 500,
                "notifyOnChange": false,
                "good": 350
            }"#,
        )
        .unwrap();

        assert_eq!(config.heater_pin, 16);
        assert_eq!(config.sensor_pin, 18);
        assert_eq!(config.poll_interval_ms, 500);
        assert!(!config.notify_on_change);
        assert_eq!(config.thresholds.good, 350);
        assert_eq!(config.thresholds.poor, 500);
    }

    #[test]
    fn rejects_shared_pin() {
        let err = SensorConfig::from_json_str(r#"{"name": "Odor", "heaterPin": 15}"#).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(ConfigError::InvalidPin { pin: 15, .. })));
    }

    #[test]
    fn rejects_bad_thresholds() {
        let err = SensorConfig::from_json_str(r#"{"name": "Odor", "fair": 480}"#).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(ConfigError::InvalidThresholds { .. })));
    }

    #[test]
    fn rejects_missing_name() {
        assert!(matches!(
            SensorConfig::from_json_str(r#"{"heaterPin": 11}"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn picks_accessory_from_bridge_config() {
        let config = SensorConfig::from_json_str(
            r#"{
                "bridge": {"name": "Homebridge"},
                "accessories": [
                    {"accessory": "Thermostat", "name": "Hall"},
                    {"accessory": "OderSensor", "name": "Kitchen"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.name, "Kitchen");
    }

    #[test]
    fn bridge_config_without_sensor() {
        let err = SensorConfig::from_json_str(r#"{"accessories": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::NotFound));
    }

    #[test]
    fn accessories_must_be_an_array() {
        let err = SensorConfig::from_json_str(r#"{"accessories": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(ConfigError::InvalidValue { reason: "accessories must be an array" })
        ));
    }
}
