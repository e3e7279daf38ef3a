//! Minew S1 temperature and humidity sensor frames.

use crate::error::DecodeError;
use crate::numeric::{ByteReader, signed_8_8};
use crate::record::{BeaconRecord, HasProperties, Properties, PropertiesBuilder};

/// Minew S1 sensor reading.
#[derive(Debug, Clone, PartialEq)]
pub struct MinewS1Frame {
    /// Battery level in percent (0-100)
    pub battery_level: u8,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent, as transmitted
    pub humidity: f64,
}

impl HasProperties for MinewS1Frame {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("battery_level", self.battery_level)
            .with("temperature", self.temperature)
            .with("humidity", self.humidity)
            .build()
    }
}

/// Decode the value of a Minew S1 element.
///
/// Layout: battery level, then temperature as big-endian signed 8.8 fixed
/// point, then humidity as a big-endian integer that is already in percent.
pub fn decode(value: &[u8]) -> Result<BeaconRecord, DecodeError> {
    let mut reader = ByteReader::new("Minew S1", value);
    Ok(BeaconRecord::MinewS1(MinewS1Frame {
        battery_level: reader.u8()?,
        temperature: signed_8_8(reader.i16_be()?),
        humidity: f64::from(reader.u16_be()?),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let BeaconRecord::MinewS1(frame) = decode(&[80, 0x17, 0x00, 0x00, 0x2D]).unwrap() else {
            panic!("expected Minew S1");
        };
        assert_eq!(frame.battery_level, 80);
        assert_eq!(frame.temperature, 23.0);
        assert_eq!(frame.humidity, 45.0);
    }

    #[test]
    fn test_below_freezing() {
        let BeaconRecord::MinewS1(frame) = decode(&[100, 0xFB, 0x80, 0x00, 0x00]).unwrap() else {
            panic!("expected Minew S1");
        };
        assert_eq!(frame.temperature, -4.5);
    }

    #[test]
    fn test_short() {
        assert!(matches!(
            decode(&[80, 0x17, 0x00, 0x00]),
            Err(DecodeError::TooShort {
                protocol: "Minew S1",
                needed: 5,
                actual: 4
            })
        ));
    }
}
