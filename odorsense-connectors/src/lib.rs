//! Outward surfaces for the odorsense air-quality sensor
//!
//! ## Overview
//!
//! The core crate turns SPI samples into an [`odorsense_core::AirQuality`]
//! category. This crate exposes that category to the outside world:
//!
//! - [`accessory`]: the fixed accessory shape the bridge sees (information
//!   service plus one air-quality sensor service) and the read/notify
//!   handlers behind it.
//! - [`publisher`]: topic layout and JSON payload for republishing the
//!   accessory state over any [`AsyncConnector`].
//! - [`mqtt`]: an MQTT connector on top of `rumqttc` (feature `mqtt`).
//!
//! ## Connector contract
//!
//! Connectors move opaque byte payloads to a topic. They keep their own
//! [`ConnectionStats`] and report connection state; reconnection is the
//! connector's business, not the caller's.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use odorsense_connectors::mqtt::{MqttConfig, MqttConnector};
//! use odorsense_connectors::publisher::AccessoryPublisher;
//! use odorsense_core::AirQuality;
//!
//! # async fn run() -> Result<(), odorsense_connectors::ConnectorError> {
//! let config = MqttConfig::new("broker.local", 1883);
//! let (connector, _queries) = MqttConnector::connect(&config);
//!
//! let mut publisher = AccessoryPublisher::new(connector, &config.base_topic, "Kitchen");
//! publisher.publish("Kitchen", AirQuality::Good).await?;
//! # Ok(())
//! # }
//! ```

pub mod accessory;
pub mod publisher;

#[cfg(feature = "mqtt")]
pub mod mqtt;

pub use accessory::{Accessory, AccessoryInformation, AirQualityAccessory, Service};
pub use publisher::{AccessoryPublisher, StatePayload, Topics};

#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttConnector, QoS};

use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The connector's background task is gone
    #[error("Not connected")]
    NotConnected,

    #[cfg(feature = "mqtt")]
    #[error("MQTT client error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Moves payloads to topics
#[async_trait::async_trait]
pub trait AsyncConnector: Send {
    type Error;

    /// Send a payload to `topic`
    async fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Get connection statistics
    fn stats(&self) -> ConnectionStats;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Number of reconnections
    pub reconnections: u32,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub(crate) fn record_failure(&mut self, err: &impl core::fmt::Display) {
        self.messages_failed += 1;
        self.last_error = Some(err.to_string());
    }
}
