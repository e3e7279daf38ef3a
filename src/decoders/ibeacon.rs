//! Apple iBeacon advertisements (manufacturer data `0x004C`).

use crate::constants::IBEACON_PROXIMITY_TYPE;
use crate::error::DecodeError;
use crate::numeric::ByteReader;
use crate::record::{BeaconRecord, HasProperties, Properties, PropertiesBuilder};
use uuid::Uuid;

const PROTOCOL: &str = "iBeacon";

/// An iBeacon proximity advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IBeaconAdvertisement {
    pub uuid: Uuid,
    pub major: u16,
    pub minor: u16,
    /// Calibrated RSSI at 1 m in dBm
    pub measured_power: i8,
}

impl IBeaconAdvertisement {
    /// Temperature in Celsius reported by a Cypress CYALKIT-E02 sensor beacon.
    ///
    /// Only meaningful for beacons advertising the Cypress default UUID; the
    /// sensor packs its readings into the minor field.
    pub fn cypress_temperature(&self) -> f64 {
        175.72 * f64::from((self.minor & 0x00FF) * 256) / 65536.0 - 46.85
    }

    /// Relative humidity in percent reported by a Cypress sensor beacon.
    pub fn cypress_humidity(&self) -> f64 {
        125.0 * f64::from(self.minor & 0xFF00) / 65536.0 - 6.0
    }
}

impl HasProperties for IBeaconAdvertisement {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("uuid", self.uuid.to_string())
            .with("major", self.major)
            .with("minor", self.minor)
            .with("measured_power", self.measured_power)
            .build()
    }
}

/// Decode Apple manufacturer data (the bytes after the `0x004C` company ID).
///
/// Other Apple continuity messages share the company ID and are rejected by
/// their type byte.
pub fn decode(data: &[u8]) -> Result<BeaconRecord, DecodeError> {
    let mut reader = ByteReader::new(PROTOCOL, data);
    let beacon_type: [u8; 2] = reader.array()?;
    if beacon_type != IBEACON_PROXIMITY_TYPE {
        return Err(DecodeError::UnsupportedFrame {
            protocol: PROTOCOL,
            frame_type: beacon_type[0],
        });
    }

    Ok(BeaconRecord::IBeacon(IBeaconAdvertisement {
        uuid: Uuid::from_bytes(reader.array()?),
        major: reader.u16_be()?,
        minor: reader.u16_be()?,
        measured_power: reader.i8()?,
    }))
}
