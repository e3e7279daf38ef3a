//! InfluxDB line protocol output formatter.

use crate::detection::Detection;
use crate::output::OutputFormatter;
use crate::record::{HasProperties, PropertyValue};
use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

/// Field values for InfluxDB line protocol
#[derive(Debug, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Float(num) => write!(f, "{num}"),
            FieldValue::Integer(num) => write!(f, "{num}i"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::String(s) => write!(f, "\"{}\"", escape_string_field(s)),
        }
    }
}

impl From<PropertyValue> for FieldValue {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Int(v) => FieldValue::Integer(v),
            PropertyValue::Float(v) => FieldValue::Float(v),
            PropertyValue::Bool(v) => FieldValue::Boolean(v),
            PropertyValue::Text(v) => FieldValue::String(v),
        }
    }
}

/// Escape quotes and backslashes in string field values.
///
/// Line breaks are written as `\n` and `\r` escapes and other control
/// characters are dropped, so a value never ends the line early.
fn escape_string_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escape commas, spaces and equals signs in tag values.
fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | ' ' | '=') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Data point in InfluxDB line protocol
#[derive(Debug)]
pub struct DataPoint {
    pub measurement: String,
    pub tag_set: BTreeMap<String, String>,
    pub field_set: BTreeMap<String, FieldValue>,
    pub timestamp: Option<SystemTime>,
}

fn fmt_tags(data_point: &DataPoint, fmt: &mut fmt::Formatter) -> fmt::Result {
    for (key, value) in data_point.tag_set.iter() {
        write!(fmt, ",{}={}", key, escape_tag(value))?;
    }
    Ok(())
}

fn fmt_fields(data_point: &DataPoint, fmt: &mut fmt::Formatter) -> fmt::Result {
    let mut first = true;
    for (key, value) in data_point.field_set.iter() {
        if first {
            first = false;
        } else {
            write!(fmt, ",")?;
        }
        write!(fmt, "{}={}", key, value)?;
    }
    Ok(())
}

fn fmt_timestamp(data_point: &DataPoint, fmt: &mut fmt::Formatter) -> fmt::Result {
    // Timestamps before the epoch are left out
    if let Some(since_epoch) = data_point
        .timestamp
        .and_then(|time| time.duration_since(SystemTime::UNIX_EPOCH).ok())
    {
        write!(fmt, " {}", since_epoch.as_nanos())?;
    }
    Ok(())
}

impl fmt::Display for DataPoint {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.measurement)?;
        fmt_tags(self, fmt)?;
        write!(fmt, " ")?;
        fmt_fields(self, fmt)?;
        fmt_timestamp(self, fmt)
    }
}

/// InfluxDB line protocol formatter.
///
/// Every detection becomes one point named after the configured measurement,
/// tagged with the record kind and the advertiser address, with the record's
/// properties as fields.
pub struct InfluxDbFormatter {
    /// The measurement name in InfluxDB
    measurement_name: String,
}

impl InfluxDbFormatter {
    /// Create a new InfluxDB formatter.
    ///
    /// # Arguments
    /// * `measurement_name` - The measurement name to use in the line protocol
    pub fn new(measurement_name: String) -> Self {
        Self { measurement_name }
    }

    fn tag_set(&self, detection: &Detection) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        tags.insert("beacon".to_string(), detection.record.kind().to_string());
        if let Some(address) = &detection.address {
            tags.insert("address".to_string(), address.clone());
        }
        tags
    }

    fn field_set(&self, detection: &Detection) -> BTreeMap<String, FieldValue> {
        detection
            .record
            .properties()
            .into_iter()
            .map(|(name, value)| (name.to_string(), FieldValue::from(value)))
            .collect()
    }

    fn to_data_point(&self, detection: &Detection) -> DataPoint {
        DataPoint {
            measurement: self.measurement_name.clone(),
            tag_set: self.tag_set(detection),
            field_set: self.field_set(detection),
            timestamp: Some(detection.timestamp),
        }
    }
}

impl OutputFormatter for InfluxDbFormatter {
    fn format(&self, detection: &Detection) -> String {
        format!("{}", self.to_data_point(detection))
    }
}
