//! `beacon-decoder` library.
//!
//! Decodes Bluetooth LE advertisement payloads from Eddystone, iBeacon,
//! Estimote, Exposure Notification, CJ Monitor and Minew S1 beacons into typed
//! records. Decoding is a pure function of the payload bytes; see
//! [`parse_packet`] and [`decode_packet`].
//!
//! The binary (`src/main.rs`) replays captured advertisements through the
//! decoder; its run loop lives in [`crate::app`].

pub mod app;
pub mod constants;
pub mod decoders;
pub mod detection;
pub mod envelope;
pub mod error;
pub mod numeric;
pub mod output;
pub mod parser;
pub mod record;
pub mod source;

// Re-export commonly used types at the crate root
pub use decoders::cj_monitor::CjMonitorAdvertisement;
pub use decoders::eddystone::{
    EddystoneEid, EddystoneEncryptedTlm, EddystoneTlm, EddystoneUid, EddystoneUrl,
};
pub use decoders::estimote::{EstimoteNearable, EstimoteTelemetryA, EstimoteTelemetryB};
pub use decoders::exposure_notification::ExposureNotification;
pub use decoders::ibeacon::IBeaconAdvertisement;
pub use decoders::minew::MinewS1Frame;
pub use detection::Detection;
pub use envelope::{AdElement, AdElements, ManufacturerData, ServiceData, elements};
pub use error::DecodeError;
pub use output::OutputFormatter;
pub use output::influxdb::InfluxDbFormatter;
pub use parser::{decode_packet, parse_packet};
pub use record::{BeaconRecord, HasProperties, Properties, PropertyValue};
pub use source::{RawPacket, SourceError, parse_line};
