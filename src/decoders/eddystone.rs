//! Eddystone frames carried in service data under UUID `0xFEAA`.
//!
//! The first byte of the service data is the frame type; all multi-byte
//! integers are big-endian.

use super::hex_string;
use crate::constants::{
    EDDYSTONE_EID_FRAME, EDDYSTONE_TLD_ENCODINGS, EDDYSTONE_TLM_ENCRYPTED, EDDYSTONE_TLM_FRAME,
    EDDYSTONE_TLM_UNENCRYPTED, EDDYSTONE_UID_FRAME, EDDYSTONE_URL_FRAME, EDDYSTONE_URL_SCHEMES,
};
use crate::error::DecodeError;
use crate::numeric::{ByteReader, signed_8_8};
use crate::record::{BeaconRecord, HasProperties, Properties, PropertiesBuilder};
use std::time::Duration;

const PROTOCOL: &str = "Eddystone";

/// Eddystone-UID: a static 16-byte beacon identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EddystoneUid {
    /// Calibrated TX power at 0 m in dBm
    pub tx_power: i8,
    /// 10-byte namespace
    pub namespace: [u8; 10],
    /// 6-byte instance within the namespace
    pub instance: [u8; 6],
}

impl HasProperties for EddystoneUid {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("namespace", hex_string(&self.namespace))
            .with("instance", hex_string(&self.instance))
            .with("tx_power", self.tx_power)
            .build()
    }
}

/// Eddystone-URL with the compressed URL expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EddystoneUrl {
    /// Calibrated TX power at 0 m in dBm
    pub tx_power: i8,
    pub url: String,
}

impl HasProperties for EddystoneUrl {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("url", self.url.as_str())
            .with("tx_power", self.tx_power)
            .build()
    }
}

/// Unencrypted Eddystone-TLM telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct EddystoneTlm {
    /// Battery voltage in mV
    pub voltage: u16,
    /// Beacon temperature in Celsius
    pub temperature: f64,
    /// Advertising PDUs sent since power-up or reboot
    pub advertising_count: u32,
    /// Time since power-up or reboot in 0.1 s units
    pub uptime_deciseconds: u32,
}

impl EddystoneTlm {
    pub fn uptime(&self) -> Duration {
        Duration::from_millis(u64::from(self.uptime_deciseconds) * 100)
    }
}

impl HasProperties for EddystoneTlm {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("voltage", self.voltage)
            .with("temperature", self.temperature)
            .with("advertising_count", self.advertising_count)
            .with("uptime_deciseconds", self.uptime_deciseconds)
            .build()
    }
}

/// Encrypted Eddystone-TLM. The ciphertext is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EddystoneEncryptedTlm {
    pub encrypted_data: [u8; 12],
    pub salt: u16,
    /// Message integrity check
    pub mic: u16,
}

impl HasProperties for EddystoneEncryptedTlm {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("encrypted_data", hex_string(&self.encrypted_data))
            .with("salt", self.salt)
            .with("mic", self.mic)
            .build()
    }
}

/// Eddystone-EID: a rotating ephemeral identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EddystoneEid {
    /// Calibrated TX power at 0 m in dBm
    pub tx_power: i8,
    pub eid: [u8; 8],
}

impl HasProperties for EddystoneEid {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("eid", hex_string(&self.eid))
            .with("tx_power", self.tx_power)
            .build()
    }
}

/// Decode Eddystone service data (the bytes after the `0xFEAA` UUID).
pub fn decode(service_data: &[u8]) -> Result<BeaconRecord, DecodeError> {
    let mut reader = ByteReader::new(PROTOCOL, service_data);
    match reader.u8()? {
        EDDYSTONE_UID_FRAME => Ok(BeaconRecord::EddystoneUid(EddystoneUid {
            tx_power: reader.i8()?,
            namespace: reader.array()?,
            instance: reader.array()?,
        })),
        EDDYSTONE_URL_FRAME => decode_url_frame(&mut reader),
        EDDYSTONE_TLM_FRAME => decode_tlm_frame(&mut reader),
        EDDYSTONE_EID_FRAME => Ok(BeaconRecord::EddystoneEid(EddystoneEid {
            tx_power: reader.i8()?,
            eid: reader.array()?,
        })),
        frame_type => Err(DecodeError::UnsupportedFrame {
            protocol: PROTOCOL,
            frame_type,
        }),
    }
}

fn decode_url_frame(reader: &mut ByteReader<'_>) -> Result<BeaconRecord, DecodeError> {
    let tx_power = reader.i8()?;
    let scheme = reader.u8()?;
    let prefix = EDDYSTONE_URL_SCHEMES
        .get(usize::from(scheme))
        .ok_or(DecodeError::UnsupportedFrame {
            protocol: "Eddystone-URL scheme",
            frame_type: scheme,
        })?;

    let mut url = String::from(*prefix);
    url.push_str(&expand_url(reader.rest()));
    Ok(BeaconRecord::EddystoneUrl(EddystoneUrl { tx_power, url }))
}

fn decode_tlm_frame(reader: &mut ByteReader<'_>) -> Result<BeaconRecord, DecodeError> {
    match reader.u8()? {
        EDDYSTONE_TLM_UNENCRYPTED => Ok(BeaconRecord::EddystoneTlm(EddystoneTlm {
            voltage: reader.u16_be()?,
            temperature: signed_8_8(reader.i16_be()?),
            advertising_count: reader.u32_be()?,
            uptime_deciseconds: reader.u32_be()?,
        })),
        EDDYSTONE_TLM_ENCRYPTED => Ok(BeaconRecord::EddystoneEncryptedTlm(EddystoneEncryptedTlm {
            encrypted_data: reader.array()?,
            salt: reader.u16_be()?,
            mic: reader.u16_be()?,
        })),
        version => Err(DecodeError::UnsupportedFrame {
            protocol: "Eddystone-TLM version",
            frame_type: version,
        }),
    }
}

/// Expand an encoded Eddystone URL body.
///
/// Bytes below the size of the expansion table stand for a TLD; anything else
/// is the character with that code.
pub fn expand_url(encoded: &[u8]) -> String {
    let mut url = String::with_capacity(encoded.len() * 2);
    for &byte in encoded {
        match EDDYSTONE_TLD_ENCODINGS.get(usize::from(byte)) {
            Some(tld) => url.push_str(tld),
            None => url.push(char::from(byte)),
        }
    }
    url
}
