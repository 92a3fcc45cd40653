//! Sense-and-publish service for a TGS2450 on a Raspberry Pi
//!
//! [`Sampler`] ties the driver, the monitor and the accessory together and
//! is what the interval loop in the binary calls on every tick.
//! [`hardware`] opens the Linux SPI device and GPIO lines, and
//! [`requests`] connects the MQTT publisher and routes incoming requests.

pub mod hardware;
pub mod requests;
pub mod sampler;

pub use requests::{connect_publisher, handle_request, Request};
pub use sampler::Sampler;
