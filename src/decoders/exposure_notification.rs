//! Exposure Notification service data (UUID `0xFD6F`).

use super::hex_string;
use crate::error::DecodeError;
use crate::numeric::ByteReader;
use crate::record::{BeaconRecord, HasProperties, Properties, PropertiesBuilder};

/// Rolling proximity identifier with its encrypted metadata, both opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureNotification {
    pub identifier: [u8; 16],
    pub encrypted_metadata: [u8; 4],
}

impl HasProperties for ExposureNotification {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("identifier", hex_string(&self.identifier))
            .with("encrypted_metadata", hex_string(&self.encrypted_metadata))
            .build()
    }
}

pub fn decode(service_data: &[u8]) -> Result<BeaconRecord, DecodeError> {
    let mut reader = ByteReader::new("Exposure Notification", service_data);
    Ok(BeaconRecord::ExposureNotification(ExposureNotification {
        identifier: reader.array()?,
        encrypted_metadata: reader.array()?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let data: Vec<u8> = (0..20).collect();
        let BeaconRecord::ExposureNotification(frame) = decode(&data).unwrap() else {
            panic!("expected exposure notification");
        };
        assert_eq!(frame.identifier[0], 0);
        assert_eq!(frame.identifier[15], 15);
        assert_eq!(frame.encrypted_metadata, [16, 17, 18, 19]);
        assert_eq!(
            frame.properties()["encrypted_metadata"].to_string(),
            "10111213"
        );
    }

    #[test]
    fn test_short_metadata() {
        let data: Vec<u8> = (0..19).collect();
        assert!(matches!(
            decode(&data),
            Err(DecodeError::TooShort {
                needed: 20,
                actual: 19,
                ..
            })
        ));
    }
}
