//! Republishing the accessory state over a connector
//!
//! Topic layout for an accessory named `Kitchen Odor` under base `homebridge`:
//!
//! ```text
//! homebridge/kitchen-odor/airQuality   state, JSON, retained
//! homebridge/kitchen-odor/get          query; any payload triggers a republish
//! homebridge/kitchen-odor/identify     identify request
//! ```
//!
//! State payload:
//!
//! ```json
//! {"name":"Kitchen Odor","characteristic":"AirQuality","value":3,"label":"fair"}
//! ```

use odorsense_core::AirQuality;
use serde::{Deserialize, Serialize};

use crate::accessory::AirQualityAccessory;
use crate::AsyncConnector;

/// Characteristic name carried in every payload
pub const CHARACTERISTIC: &str = "AirQuality";

/// Topics owned by one accessory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    /// Where the current state is published
    pub state: String,
    /// Where queries arrive
    pub get: String,
    /// Where identify requests arrive
    pub identify: String,
}

impl Topics {
    pub fn new(base: &str, name: &str) -> Self {
        let prefix = format!("{}/{}", base.trim_end_matches('/'), slug(name));
        Self {
            state: format!("{prefix}/airQuality"),
            get: format!("{prefix}/get"),
            identify: format!("{prefix}/identify"),
        }
    }
}

/// Lower-case, dash-separated form of a display name
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut dash = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            dash = false;
        } else if !dash && !out.is_empty() {
            out.push('-');
            dash = true;
        }
    }
    if dash {
        out.pop();
    }
    out
}

/// JSON body of a state message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    pub name: String,
    pub characteristic: String,
    pub value: u8,
    pub label: String,
}

impl StatePayload {
    pub fn new(name: &str, quality: AirQuality) -> Self {
        Self {
            name: name.to_string(),
            characteristic: CHARACTERISTIC.to_string(),
            value: quality.as_u8(),
            label: quality.label().to_string(),
        }
    }
}

/// Publishes an accessory's state through any [`AsyncConnector`]
pub struct AccessoryPublisher<C> {
    connector: C,
    topics: Topics,
    last_published: Option<AirQuality>,
}

impl<C> AccessoryPublisher<C>
where
    C: AsyncConnector,
    C::Error: From<serde_json::Error>,
{
    pub fn new(connector: C, base_topic: &str, name: &str) -> Self {
        Self {
            connector,
            topics: Topics::new(base_topic, name),
            last_published: None,
        }
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn into_connector(self) -> C {
        self.connector
    }

    /// Last state successfully handed to the connector
    pub fn last_published(&self) -> Option<AirQuality> {
        self.last_published
    }

    /// Publish `quality` as the accessory's state
    pub async fn publish(&mut self, name: &str, quality: AirQuality) -> Result<(), C::Error> {
        let payload = serde_json::to_vec(&StatePayload::new(name, quality))?;
        self.connector.send(&self.topics.state, &payload).await?;
        self.last_published = Some(quality);
        log::debug!("published {} to {}", quality, self.topics.state);
        Ok(())
    }

    /// Answer a query by reading the characteristic and republishing it
    pub async fn answer_query(&mut self, accessory: &AirQualityAccessory) -> Result<(), C::Error> {
        let quality = accessory.get_air_quality();
        self.publish(accessory.name(), quality).await
    }

    /// Whether `topic` is this accessory's query topic
    pub fn is_query(&self, topic: &str) -> bool {
        topic == self.topics.get
    }

    pub fn is_identify(&self, topic: &str) -> bool {
        topic == self.topics.identify
    }
}
