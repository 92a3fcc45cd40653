//! MQTT side of the daemon: connecting the publisher and routing requests

use odorsense_connectors::mqtt::{Incoming, MqttConfig, MqttConnector};
use odorsense_connectors::{
    Accessory, AccessoryPublisher, AirQualityAccessory, AsyncConnector, ConnectorError, Topics,
};
use tokio::sync::mpsc;

/// What an incoming message turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// State query, answered by republishing
    Query,
    /// Identify request
    Identify,
    /// Not addressed to this accessory
    Ignored,
}

/// Start the MQTT client and subscribe to the accessory's request topics
///
/// Must be called inside a tokio runtime. Subscriptions are restored after
/// every reconnect.
pub fn connect_publisher(
    mqtt: &MqttConfig,
    name: &str,
) -> Result<(AccessoryPublisher<MqttConnector>, mpsc::Receiver<Incoming>), ConnectorError> {
    let (mut connector, incoming) = MqttConnector::connect(mqtt);

    let topics = Topics::new(&mqtt.base_topic, name);
    connector.subscribe(&topics.get)?;
    connector.subscribe(&topics.identify)?;
    tracing::info!(state = %topics.state, get = %topics.get, "MQTT topics");

    Ok((AccessoryPublisher::new(connector, &mqtt.base_topic, name), incoming))
}

/// Route one message received on `topic`
pub async fn handle_request<C>(
    publisher: &mut AccessoryPublisher<C>,
    accessory: &AirQualityAccessory,
    topic: &str,
) -> Request
where
    C: AsyncConnector<Error = ConnectorError>,
{
    if publisher.is_query(topic) {
        if let Err(err) = publisher.answer_query(accessory).await {
            tracing::warn!(%err, "answering query failed");
        }
        Request::Query
    } else if publisher.is_identify(topic) {
        accessory.identify();
        Request::Identify
    } else {
        tracing::debug!(topic, "ignoring message");
        Request::Ignored
    }
}
