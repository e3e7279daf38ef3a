//! Decoded beacon records and their generic property view.

use crate::decoders::cj_monitor::CjMonitorAdvertisement;
use crate::decoders::eddystone::{
    EddystoneEid, EddystoneEncryptedTlm, EddystoneTlm, EddystoneUid, EddystoneUrl,
};
use crate::decoders::estimote::{EstimoteNearable, EstimoteTelemetryA, EstimoteTelemetryB};
use crate::decoders::exposure_notification::ExposureNotification;
use crate::decoders::ibeacon::IBeaconAdvertisement;
use crate::decoders::minew::MinewS1Frame;
use std::collections::BTreeMap;
use std::fmt;

/// Value of a single record property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Text(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for PropertyValue {
            fn from(v: $t) -> Self {
                PropertyValue::Int(i64::from(v))
            }
        })*
    };
}

impl_from_int!(i8, u8, i16, u16, i32, u32);

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

/// Field name to value mapping of a record.
///
/// Absent optional fields are left out rather than stored as placeholders.
pub type Properties = BTreeMap<&'static str, PropertyValue>;

/// Generic, name-keyed access to the fields of a decoded record.
pub trait HasProperties {
    fn properties(&self) -> Properties;
}

/// Collects record fields into a [`Properties`] map, skipping `None`.
#[derive(Debug, Default)]
pub(crate) struct PropertiesBuilder(Properties);

impl PropertiesBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, name: &'static str, value: impl Into<PropertyValue>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub(crate) fn with_opt<T: Into<PropertyValue>>(
        self,
        name: &'static str,
        value: Option<T>,
    ) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    pub(crate) fn with_xyz(self, prefix: [&'static str; 3], value: Option<(f64, f64, f64)>) -> Self {
        match value {
            Some((x, y, z)) => self.with(prefix[0], x).with(prefix[1], y).with(prefix[2], z),
            None => self,
        }
    }

    pub(crate) fn build(self) -> Properties {
        self.0
    }
}

/// A decoded beacon advertisement, tagged by protocol and frame.
#[derive(Debug, Clone, PartialEq)]
pub enum BeaconRecord {
    EddystoneUid(EddystoneUid),
    EddystoneUrl(EddystoneUrl),
    EddystoneTlm(EddystoneTlm),
    EddystoneEncryptedTlm(EddystoneEncryptedTlm),
    EddystoneEid(EddystoneEid),
    EstimoteNearable(EstimoteNearable),
    EstimoteTelemetryA(EstimoteTelemetryA),
    EstimoteTelemetryB(EstimoteTelemetryB),
    ExposureNotification(ExposureNotification),
    IBeacon(IBeaconAdvertisement),
    CjMonitor(CjMonitorAdvertisement),
    MinewS1(MinewS1Frame),
}

impl BeaconRecord {
    /// Stable snake_case name of the record type.
    pub fn kind(&self) -> &'static str {
        match self {
            BeaconRecord::EddystoneUid(_) => "eddystone_uid",
            BeaconRecord::EddystoneUrl(_) => "eddystone_url",
            BeaconRecord::EddystoneTlm(_) => "eddystone_tlm",
            BeaconRecord::EddystoneEncryptedTlm(_) => "eddystone_encrypted_tlm",
            BeaconRecord::EddystoneEid(_) => "eddystone_eid",
            BeaconRecord::EstimoteNearable(_) => "estimote_nearable",
            BeaconRecord::EstimoteTelemetryA(_) => "estimote_telemetry_a",
            BeaconRecord::EstimoteTelemetryB(_) => "estimote_telemetry_b",
            BeaconRecord::ExposureNotification(_) => "exposure_notification",
            BeaconRecord::IBeacon(_) => "ibeacon",
            BeaconRecord::CjMonitor(_) => "cj_monitor",
            BeaconRecord::MinewS1(_) => "minew_s1",
        }
    }

    fn inner(&self) -> &dyn HasProperties {
        match self {
            BeaconRecord::EddystoneUid(r) => r,
            BeaconRecord::EddystoneUrl(r) => r,
            BeaconRecord::EddystoneTlm(r) => r,
            BeaconRecord::EddystoneEncryptedTlm(r) => r,
            BeaconRecord::EddystoneEid(r) => r,
            BeaconRecord::EstimoteNearable(r) => r,
            BeaconRecord::EstimoteTelemetryA(r) => r,
            BeaconRecord::EstimoteTelemetryB(r) => r,
            BeaconRecord::ExposureNotification(r) => r,
            BeaconRecord::IBeacon(r) => r,
            BeaconRecord::CjMonitor(r) => r,
            BeaconRecord::MinewS1(r) => r,
        }
    }
}

impl HasProperties for BeaconRecord {
    fn properties(&self) -> Properties {
        self.inner().properties()
    }
}

impl fmt::Display for BeaconRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.kind())?;
        for (i, (name, value)) in self.properties().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_skips_none() {
        let props = PropertiesBuilder::new()
            .with("a", 1u8)
            .with_opt::<f64>("b", None)
            .with_opt("c", Some(true))
            .with_xyz(["x", "y", "z"], None)
            .build();
        assert_eq!(props.len(), 2);
        assert_eq!(props["a"], PropertyValue::Int(1));
        assert_eq!(props["c"], PropertyValue::Bool(true));
    }

    #[test]
    fn test_display() {
        let record = BeaconRecord::MinewS1(MinewS1Frame {
            battery_level: 80,
            temperature: 23.0,
            humidity: 45.0,
        });
        assert_eq!(
            record.to_string(),
            "minew_s1<battery_level: 80, humidity: 45, temperature: 23>"
        );
    }
}
