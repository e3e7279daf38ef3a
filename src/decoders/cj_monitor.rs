//! Control-J Monitor sensor advertisements (manufacturer data `0x0272`).
//!
//! The sensor readings travel in the manufacturer data element while the
//! device name sits in a separate complete-local-name element, so this decoder
//! works on the whole element sequence.

use crate::constants::{CJ_MANUFACTURER_ID, COMPLETE_LOCAL_NAME_TYPE};
use crate::envelope::AdElement;
use crate::error::DecodeError;
use crate::numeric::ByteReader;
use crate::record::{BeaconRecord, HasProperties, Properties, PropertiesBuilder};

const PROTOCOL: &str = "CJ Monitor";

/// Temperature, humidity and light readings of a CJ Monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct CjMonitorAdvertisement {
    pub company_id: u16,
    pub beacon_type: u16,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Light level in lux
    pub light: f64,
    /// Complete local name, if advertised
    pub name: Option<String>,
}

impl HasProperties for CjMonitorAdvertisement {
    fn properties(&self) -> Properties {
        PropertiesBuilder::new()
            .with("beacon_type", self.beacon_type)
            .with("temperature", self.temperature)
            .with("humidity", self.humidity)
            .with("light", self.light)
            .with_opt("name", self.name.as_deref())
            .build()
    }
}

/// Assemble a CJ Monitor record from every element of the advertisement.
pub fn decode(elements: &[AdElement<'_>]) -> Result<BeaconRecord, DecodeError> {
    let data = elements
        .iter()
        .filter_map(AdElement::manufacturer_data)
        .find(|m| m.company_identifier == CJ_MANUFACTURER_ID)
        .ok_or(DecodeError::Unrecognized)?
        .data;

    let name = elements
        .iter()
        .find(|e| e.ad_type == COMPLETE_LOCAL_NAME_TYPE)
        .map(|e| String::from_utf8_lossy(e.value).into_owned());

    let mut reader = ByteReader::new(PROTOCOL, data);
    let beacon_type = reader.u16_le()?;
    let temperature = f64::from(reader.i16_le()?) / 100.0;
    let humidity = f64::from(reader.u8()?);
    let light = 2f64.powf(f64::from(reader.u8()?) / 40.0);

    Ok(BeaconRecord::CjMonitor(CjMonitorAdvertisement {
        company_id: CJ_MANUFACTURER_ID,
        beacon_type,
        temperature,
        humidity,
        light,
        name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MANUFACTURER_SPECIFIC_DATA_TYPE;

    const READINGS: [u8; 8] = [
        0x72, 0x02, // company id
        0x10, 0x00, // beacon type
        0x0A, 0x09, // 23.14 C
        0x2D, // 45 %
        0x78, // 2^(120/40) lux
    ];

    #[test]
    fn test_decode_with_name() {
        let elements = [
            AdElement {
                ad_type: 0x01,
                value: &[0x06],
            },
            AdElement {
                ad_type: MANUFACTURER_SPECIFIC_DATA_TYPE,
                value: &READINGS,
            },
            AdElement {
                ad_type: COMPLETE_LOCAL_NAME_TYPE,
                value: b"Kitchen",
            },
        ];
        let BeaconRecord::CjMonitor(cj) = decode(&elements).unwrap() else {
            panic!("expected CJ monitor");
        };
        assert_eq!(cj.company_id, 0x0272);
        assert_eq!(cj.beacon_type, 0x10);
        assert_eq!(cj.temperature, 23.14);
        assert_eq!(cj.humidity, 45.0);
        assert_eq!(cj.light, 8.0);
        assert_eq!(cj.name.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_decode_without_name() {
        let elements = [AdElement {
            ad_type: MANUFACTURER_SPECIFIC_DATA_TYPE,
            value: &READINGS,
        }];
        let BeaconRecord::CjMonitor(cj) = decode(&elements).unwrap() else {
            panic!("expected CJ monitor");
        };
        assert_eq!(cj.name, None);
        assert!(!cj.properties().contains_key("name"));
    }

    #[test]
    fn test_short_readings() {
        let elements = [AdElement {
            ad_type: MANUFACTURER_SPECIFIC_DATA_TYPE,
            value: &READINGS[..6],
        }];
        assert!(matches!(
            decode(&elements),
            Err(DecodeError::TooShort { .. })
        ));
    }

    #[test]
    fn test_no_cj_element() {
        assert_eq!(decode(&[]), Err(DecodeError::Unrecognized));
    }
}
