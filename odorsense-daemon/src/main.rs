//! odorsense daemon
//!
//! Samples a TGS2450 through an MCP3002-style ADC on a fixed interval and
//! exposes the result as an air-quality accessory. With `--mqtt-host` the
//! state is also published to a broker and `get`/`identify` requests are
//! answered.
//!
//! ## Environment Variables
//! - `ODORSENSE_CONFIG`: accessory config file
//! - `ODORSENSE_MQTT_HOST`: broker host (no broker if unset)
//! - `ODORSENSE_MQTT_PORT`: broker port (default: 1883)
//! - `RUST_LOG`: log filter (default: info)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use odorsense_connectors::mqtt::MqttConfig;
use odorsense_connectors::AirQualityAccessory;
use odorsense_core::{AirQualityMonitor, SensorConfig, SystemTime};
use odorsense_daemon::{connect_publisher, handle_request, hardware, Sampler};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "odorsense")]
#[command(version)]
#[command(about = "TGS2450 air-quality accessory daemon", long_about = None)]
struct Args {
    /// Bridge config file holding the OderSensor accessory block
    #[arg(short, long, env = "ODORSENSE_CONFIG")]
    config: PathBuf,

    /// MQTT broker host
    #[arg(long, env = "ODORSENSE_MQTT_HOST")]
    mqtt_host: Option<String>,

    /// MQTT broker port
    #[arg(long, default_value_t = 1883, env = "ODORSENSE_MQTT_PORT")]
    mqtt_port: u16,

    /// Prefix of every published topic
    #[arg(long, default_value = "odorsense")]
    base_topic: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = SensorConfig::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    tracing::info!(name = %config.name, "accessory config loaded");

    let accessory = Arc::new(AirQualityAccessory::new(config.name.clone()));
    let sensor = hardware::open_sensor(&config)?;
    let monitor = AirQualityMonitor::new(config.thresholds, SystemTime)
        .with_notify_on_change(config.notify_on_change);
    let mut sampler = Sampler::new(sensor, hardware::delay(), monitor, accessory.clone());

    let (mut publisher, mut incoming) = match &args.mqtt_host {
        Some(host) => {
            let mqtt = MqttConfig::new(host, args.mqtt_port).with_base_topic(&args.base_topic);
            let (publisher, incoming) = connect_publisher(&mqtt, &config.name)?;
            (Some(publisher), incoming)
        }
        // sender dropped at once, so the request arm below stays disabled
        None => (None, mpsc::channel(1).1),
    };
    let mut changes = accessory.subscribe();

    let mut interval = tokio::time::interval(config.poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .context("installing SIGTERM handler")?;

    tracing::info!(interval_ms = config.poll_interval_ms, "sampling started");

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("SIGINT received");
                break;
            }
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received");
                break;
            }
            _ = interval.tick() => {
                tokio::task::block_in_place(|| sampler.tick());
            }
            Ok(()) = changes.changed() => {
                let quality = *changes.borrow_and_update();
                if let Some(publisher) = publisher.as_mut() {
                    if let Err(err) = publisher.publish(accessory.name(), quality).await {
                        tracing::warn!(%err, "publishing state failed");
                    }
                }
            }
            Some(message) = incoming.recv() => {
                if let Some(publisher) = publisher.as_mut() {
                    handle_request(publisher, &accessory, &message.topic).await;
                }
            }
        }
    }

    let stats = sampler.stats();
    drop(sampler.shutdown());
    if let Some(publisher) = publisher {
        publisher.into_connector().shutdown().await;
    }

    tracing::info!(
        samples = stats.samples,
        failures = stats.failures,
        changes = stats.changes,
        "sensor lines low, SPI released, shut down"
    );
    Ok(())
}
