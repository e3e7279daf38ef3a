//! Output formatters for decoded beacon records.
//!
//! Currently supports InfluxDB line protocol.

pub mod influxdb;

use crate::detection::Detection;

/// Trait for formatting detections into output strings.
pub trait OutputFormatter: Send + Sync {
    /// Format one detection as a single line (without trailing newline).
    fn format(&self, detection: &Detection) -> String;
}
