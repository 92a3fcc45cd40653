//! Tests for loading the accessory config from disk

use std::io::Write;

use odorsense_core::{ConfigError, LoadError, SensorConfig};
use tempfile::NamedTempFile;

#[test]
fn loads_bridge_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "bridge": {{ "name": "Homebridge", "port": 51826 }},
            "accessories": [
                {{
                    "accessory": "OderSensor",
                    "name": "Barn",
                    "spiDevice": "/dev/spidev0.1",
                    "heaterPin": 29,
                    "sensorPin": 31,
                    "poor": 600, "inferior": 520, "fair": 440, "good": 360, "excellent": 280
                }}
            ]
        }}"#
    )
    .unwrap();
    file.flush().unwrap();

    let config = SensorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.name, "Barn");
    assert_eq!(config.spi_device, "/dev/spidev0.1");
    assert_eq!(config.heater_line(), Ok(5));
    assert_eq!(config.sensor_line(), Ok(6));
    assert_eq!(config.thresholds.poor, 600);
    assert_eq!(config.thresholds.excellent, 280);
    assert_eq!(config.spi_clock_hz, 1_000_000);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = SensorConfig::from_file(dir.path().join("config.json"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn spi_pin_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "name": "Odor", "sensorPin": 24 }}"#).unwrap();
    file.flush().unwrap();

    let result = SensorConfig::from_file(file.path());
    assert!(matches!(
        result,
        Err(LoadError::Invalid(ConfigError::InvalidPin { pin: 24, .. }))
    ));
}

#[test]
fn poll_interval_too_short() {
    let result = SensorConfig::from_json_str(r#"{ "name": "Odor", "pollIntervalMs": 5 }"#);
    assert!(matches!(
        result,
        Err(LoadError::Invalid(ConfigError::InvalidTiming { .. }))
    ));
}
