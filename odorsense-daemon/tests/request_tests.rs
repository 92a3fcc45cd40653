//! Routing of MQTT requests to the accessory

use odorsense_connectors::mqtt::MqttConfig;
use odorsense_connectors::{
    AccessoryPublisher, AirQualityAccessory, AsyncConnector, ConnectionStats, ConnectorError,
    StatePayload,
};
use odorsense_core::AirQuality;
use odorsense_daemon::{connect_publisher, handle_request, Request};

#[derive(Default)]
struct RecordingConnector {
    sent: Vec<(String, Vec<u8>)>,
}

#[async_trait::async_trait]
impl AsyncConnector for RecordingConnector {
    type Error = ConnectorError;

    async fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        self.sent.push((topic.to_string(), data.to_vec()));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn stats(&self) -> ConnectionStats {
        ConnectionStats { messages_sent: self.sent.len() as u64, ..Default::default() }
    }
}

fn publisher() -> AccessoryPublisher<RecordingConnector> {
    AccessoryPublisher::new(RecordingConnector::default(), "hb", "Barn Odor")
}

#[tokio::test]
async fn get_republishes_current_state() {
    let accessory = AirQualityAccessory::new("Barn Odor");
    accessory.update(AirQuality::Inferior);
    let mut publisher = publisher();

    let request = handle_request(&mut publisher, &accessory, "hb/barn-odor/get").await;
    assert_eq!(request, Request::Query);

    let sent = &publisher.connector().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "hb/barn-odor/airQuality");
    let payload: StatePayload = serde_json::from_slice(&sent[0].1).unwrap();
    assert_eq!(payload, StatePayload::new("Barn Odor", AirQuality::Inferior));
}

#[tokio::test]
async fn identify_publishes_nothing() {
    let accessory = AirQualityAccessory::new("Barn Odor");
    let mut publisher = publisher();

    let request = handle_request(&mut publisher, &accessory, "hb/barn-odor/identify").await;
    assert_eq!(request, Request::Identify);
    assert!(publisher.connector().sent.is_empty());
}

#[tokio::test]
async fn other_topics_are_ignored() {
    let accessory = AirQualityAccessory::new("Barn Odor");
    let mut publisher = publisher();

    for topic in ["hb/barn-odor/airQuality", "hb/kitchen/get", "hb/barn-odor/get/extra"] {
        assert_eq!(handle_request(&mut publisher, &accessory, topic).await, Request::Ignored);
    }
    assert!(publisher.connector().sent.is_empty());
}

#[tokio::test]
async fn connect_publisher_uses_accessory_topics() {
    // nothing listens on port 1; subscriptions are queued
    let mqtt = MqttConfig::new("127.0.0.1", 1)
        .with_client_id("odorsense-request-test")
        .with_base_topic("homebridge");
    let (publisher, _incoming) = connect_publisher(&mqtt, "Barn Odor").unwrap();

    assert_eq!(publisher.topics().state, "homebridge/barn-odor/airQuality");
    assert!(publisher.is_query("homebridge/barn-odor/get"));
    assert!(publisher.is_identify("homebridge/barn-odor/identify"));
    assert!(!publisher.connector().is_connected());

    publisher.into_connector().shutdown().await;
}
