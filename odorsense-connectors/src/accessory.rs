//! Accessory interface exposed to the bridge
//!
//! The accessory has a fixed shape: an information service (name,
//! manufacturer, model) and one air-quality sensor service whose single
//! `AirQuality` characteristic is readable and, optionally, notifies on
//! change.
//!
//! The sampling loop owns the only writer; any number of readers can query
//! the current value or subscribe to change notifications.
//!
//! ```rust
//! use odorsense_connectors::accessory::{Accessory, AirQualityAccessory};
//! use odorsense_core::AirQuality;
//!
//! let accessory = AirQualityAccessory::new("Kitchen");
//! let changes = accessory.subscribe();
//!
//! accessory.update(AirQuality::Good);      // stored, no notification
//! assert!(!changes.has_changed().unwrap());
//!
//! accessory.notify(AirQuality::Poor);      // stored and announced
//! assert!(changes.has_changed().unwrap());
//! assert_eq!(accessory.get_air_quality(), AirQuality::Poor);
//! ```

use odorsense_core::AirQuality;
use serde::Serialize;
use tokio::sync::watch;

/// Manufacturer reported on the information service
pub const MANUFACTURER: &str = "Kawabata Farm";

/// Model reported on the information service
pub const MODEL: &str = "TGS2450";

/// Contents of the accessory information service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub firmware_revision: String,
}

impl AccessoryInformation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            firmware_revision: odorsense_core::VERSION.to_string(),
        }
    }
}

/// Services offered by an accessory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Service {
    /// Identification strings
    AccessoryInformation(AccessoryInformation),
    /// Air-quality sensor with its current characteristic value
    #[serde(rename_all = "camelCase")]
    AirQualitySensor {
        name: String,
        air_quality: AirQuality,
    },
}

/// Contract every accessory fulfils towards the bridge
pub trait Accessory {
    /// Identification strings
    fn information(&self) -> &AccessoryInformation;

    /// Called when the user asks the accessory to identify itself,
    /// usually only during pairing
    fn identify(&self);

    /// All services, information service first
    fn services(&self) -> Vec<Service>;
}

/// Air-quality sensor accessory backed by a watch channel
#[derive(Debug)]
pub struct AirQualityAccessory {
    information: AccessoryInformation,
    state: watch::Sender<AirQuality>,
}

impl AirQualityAccessory {
    /// New accessory reporting `Unknown` until the first sample
    pub fn new(name: impl Into<String>) -> Self {
        let (state, _) = watch::channel(AirQuality::Unknown);
        Self {
            information: AccessoryInformation::new(name),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.information.name
    }

    /// Read handler of the `AirQuality` characteristic
    pub fn get_air_quality(&self) -> AirQuality {
        let current = *self.state.borrow();
        log::info!("Current state of the sensor was returned: {}", current.as_u8());
        current
    }

    /// Store a value without notifying subscribers
    pub fn update(&self, quality: AirQuality) {
        self.state.send_if_modified(|value| {
            *value = quality;
            false
        });
    }

    /// Store a value and notify subscribers
    pub fn notify(&self, quality: AirQuality) {
        log::info!("{}: air quality changed to {}", self.information.name, quality);
        self.state.send_replace(quality);
    }

    /// Receiver woken on every notification
    pub fn subscribe(&self) -> watch::Receiver<AirQuality> {
        self.state.subscribe()
    }
}

impl Accessory for AirQualityAccessory {
    fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    fn identify(&self) {
        log::info!("Identify!");
    }

    fn services(&self) -> Vec<Service> {
        vec![
            Service::AccessoryInformation(self.information.clone()),
            Service::AirQualitySensor {
                name: self.information.name.clone(),
                air_quality: *self.state.borrow(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn information_defaults() {
        let accessory = AirQualityAccessory::new("Odor");
        let info = accessory.information();
        assert_eq!(info.name, "Odor");
        assert_eq!(info.manufacturer, "Kawabata Farm");
        assert_eq!(info.model, "TGS2450");
    }

    #[test]
    fn services_in_fixed_order() {
        let accessory = AirQualityAccessory::new("Odor");
        accessory.update(AirQuality::Fair);

        let services = accessory.services();
        assert_eq!(services.len(), 2);
        assert!(matches!(services[0], Service::AccessoryInformation(_)));
        assert_eq!(
            services[1],
            Service::AirQualitySensor { name: "Odor".into(), air_quality: AirQuality::Fair }
        );
    }

    #[test]
    fn starts_unknown() {
        assert_eq!(AirQualityAccessory::new("Odor").get_air_quality(), AirQuality::Unknown);
    }

    #[test]
    fn silent_update_is_readable() {
        let accessory = AirQualityAccessory::new("Odor");
        let rx = accessory.subscribe();

        accessory.update(AirQuality::Excellent);
        assert_eq!(accessory.get_air_quality(), AirQuality::Excellent);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), AirQuality::Excellent);
    }

    #[tokio::test]
    async fn notification_wakes_subscriber() {
        let accessory = AirQualityAccessory::new("Odor");
        let mut rx = accessory.subscribe();

        let waiter = tokio::spawn(async move {
            rx.changed().await.unwrap();
            *rx.borrow_and_update()
        });

        tokio::task::yield_now().await;
        accessory.notify(AirQuality::Inferior);

        assert_eq!(waiter.await.unwrap(), AirQuality::Inferior);
    }

    #[test]
    fn service_serialization() {
        let service = Service::AirQualitySensor { name: "Odor".into(), air_quality: AirQuality::Good };
        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "airQualitySensor", "name": "Odor", "airQuality": "good" })
        );
    }
}
