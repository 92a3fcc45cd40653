//! MQTT connector on top of `rumqttc`
//!
//! [`MqttConnector::connect`] returns the connector and a receiver of
//! messages arriving on subscribed topics. A background task drives the
//! `rumqttc` event loop: it reconnects after errors, restores
//! subscriptions on every `ConnAck`, and forwards incoming publishes.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Packet};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{AsyncConnector, ConnectionStats, ConnectorError};

pub use rumqttc::QoS;

/// Requests buffered between the client handle and the event loop
const REQUEST_CAPACITY: usize = 16;

/// Incoming messages buffered for the consumer
const INCOMING_CAPACITY: usize = 32;

/// Pause after a failed connection attempt
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Broker connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// Prefix for every accessory topic
    pub base_topic: String,
    pub qos: QoS,
    /// Retain state messages on the broker
    pub retain: bool,
}

impl MqttConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: format!("odorsense-{}", std::process::id()),
            keep_alive_secs: 30,
            base_topic: "odorsense".to_string(),
            qos: QoS::AtLeastOnce,
            retain: true,
        }
    }

    pub fn with_base_topic(mut self, base: impl Into<String>) -> Self {
        self.base_topic = base.into();
        self
    }

    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(Duration::from_secs(self.keep_alive_secs.max(5)));
        options
    }
}

/// Message received on a subscribed topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub topic: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Default)]
struct Link {
    connected: AtomicBool,
    connacks: AtomicU32,
    subscriptions: Mutex<Vec<String>>,
}

impl Link {
    fn subscriptions(&self) -> Vec<String> {
        match self.subscriptions.lock() {
            Ok(subs) => subs.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn add_subscription(&self, topic: &str) {
        let mut subs = match self.subscriptions.lock() {
            Ok(subs) => subs,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !subs.iter().any(|t| t == topic) {
            subs.push(topic.to_string());
        }
    }
}

/// MQTT publisher with a background event loop
pub struct MqttConnector {
    client: AsyncClient,
    qos: QoS,
    retain: bool,
    link: Arc<Link>,
    stats: ConnectionStats,
    task: JoinHandle<()>,
}

impl MqttConnector {
    /// Start the client. Must be called inside a tokio runtime.
    pub fn connect(config: &MqttConfig) -> (Self, mpsc::Receiver<Incoming>) {
        let (client, eventloop) = AsyncClient::new(config.options(), REQUEST_CAPACITY);
        let (tx, rx) = mpsc::channel(INCOMING_CAPACITY);
        let link = Arc::new(Link::default());

        let task = tokio::spawn(drive(eventloop, client.clone(), config.qos, link.clone(), tx));
        log::info!("MQTT client {} connecting to {}:{}", config.client_id, config.host, config.port);

        let connector = Self {
            client,
            qos: config.qos,
            retain: config.retain,
            link,
            stats: ConnectionStats::default(),
            task,
        };
        (connector, rx)
    }

    /// Subscribe now and again after every reconnect
    pub fn subscribe(&mut self, topic: &str) -> Result<(), ConnectorError> {
        self.link.add_subscription(topic);
        self.client.try_subscribe(topic, self.qos)?;
        Ok(())
    }

    /// Send DISCONNECT and stop the event loop
    pub async fn shutdown(self) {
        if let Err(err) = self.client.try_disconnect() {
            log::debug!("MQTT disconnect: {}", err);
        }
        // give the event loop a moment to flush the DISCONNECT
        let abort = self.task.abort_handle();
        if tokio::time::timeout(Duration::from_millis(500), self.task).await.is_err() {
            abort.abort();
        }
    }
}

#[async_trait::async_trait]
impl AsyncConnector for MqttConnector {
    type Error = ConnectorError;

    async fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        if self.task.is_finished() {
            self.stats.record_failure(&ConnectorError::NotConnected);
            return Err(ConnectorError::NotConnected);
        }
        // the request queue is not drained while the broker is unreachable
        match self.client.try_publish(topic, self.qos, self.retain, data.to_vec()) {
            Ok(()) => {
                self.stats.record_sent(data.len());
                Ok(())
            }
            Err(err) => {
                self.stats.record_failure(&err);
                Err(err.into())
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.link.connected.load(Ordering::Relaxed)
    }

    fn stats(&self) -> ConnectionStats {
        let mut stats = self.stats.clone();
        stats.reconnections = self.link.connacks.load(Ordering::Relaxed).saturating_sub(1);
        stats
    }
}

async fn drive(
    mut eventloop: EventLoop,
    client: AsyncClient,
    qos: QoS,
    link: Arc<Link>,
    incoming: mpsc::Sender<Incoming>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                link.connected.store(true, Ordering::Relaxed);
                link.connacks.fetch_add(1, Ordering::Relaxed);
                log::info!("MQTT connected");

                // the event loop is this task, so never await on the request queue here
                for topic in link.subscriptions() {
                    if let Err(err) = client.try_subscribe(topic.as_str(), qos) {
                        log::warn!("MQTT resubscribe to {} failed: {}", topic, err);
                    }
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = Incoming {
                    topic: publish.topic,
                    payload: publish.payload.to_vec(),
                };
                if incoming.try_send(message).is_err() {
                    log::debug!("incoming MQTT message dropped");
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                link.connected.store(false, Ordering::Relaxed);
            }
            Ok(_) => {}
            Err(ConnectionError::RequestsDone) => {
                link.connected.store(false, Ordering::Relaxed);
                log::debug!("MQTT event loop finished");
                return;
            }
            Err(err) => {
                if link.connected.swap(false, Ordering::Relaxed) {
                    log::warn!("MQTT connection lost: {}", err);
                } else {
                    log::debug!("MQTT connect failed: {}", err);
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = MqttConfig::new("broker.local", 1883).with_base_topic("homebridge");
        assert_eq!(config.host, "broker.local");
        assert_eq!(config.port, 1883);
        assert_eq!(config.base_topic, "homebridge");
        assert_eq!(config.qos, QoS::AtLeastOnce);
        assert!(config.retain);
        assert!(config.client_id.starts_with("odorsense-"));
    }

    #[test]
    fn keep_alive_has_floor() {
        let mut config = MqttConfig::new("localhost", 1883);
        config.keep_alive_secs = 0;
        assert_eq!(config.options().keep_alive(), Duration::from_secs(5));
    }

    #[test]
    fn subscriptions_are_deduplicated() {
        let link = Link::default();
        link.add_subscription("a/get");
        link.add_subscription("a/get");
        link.add_subscription("b/get");
        assert_eq!(link.subscriptions(), vec!["a/get".to_string(), "b/get".to_string()]);
    }

    #[tokio::test]
    async fn publish_is_queued_while_offline() {
        // nothing listens on port 1
        let config = MqttConfig::new("127.0.0.1", 1).with_client_id("odorsense-test");
        let (mut connector, _rx) = MqttConnector::connect(&config);

        connector.send("odorsense/test/airQuality", b"{}").await.unwrap();
        assert!(!connector.is_connected());

        let stats = connector.stats();
        assert_eq!(stats.messages_sent, 1);
        assert_eq!(stats.bytes_sent, 2);
        assert_eq!(stats.reconnections, 0);

        connector.shutdown().await;
    }

    #[tokio::test]
    async fn full_queue_fails_fast_while_offline() {
        let config = MqttConfig::new("127.0.0.1", 1).with_client_id("odorsense-queue-test");
        let (mut connector, _rx) = MqttConnector::connect(&config);

        let total = REQUEST_CAPACITY + 8;
        let mut rejected = 0;
        for _ in 0..total {
            let sent = tokio::time::timeout(
                Duration::from_secs(1),
                connector.send("odorsense/test/airQuality", b"{}"),
            )
            .await
            .expect("send must not wait for the broker");
            if sent.is_err() {
                rejected += 1;
            }
        }

        let stats = connector.stats();
        assert!(rejected >= 8);
        assert!(stats.messages_sent as usize <= REQUEST_CAPACITY);
        assert_eq!(stats.messages_sent as usize + stats.messages_failed as usize, total);
        assert!(stats.last_error.is_some());

        connector.shutdown().await;
    }
}
