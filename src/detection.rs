//! A decoded beacon record together with where and when it was seen.

use crate::record::BeaconRecord;
use std::time::SystemTime;

/// A beacon record observed in one advertisement.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Advertiser address, when the input provided one
    pub address: Option<String>,
    /// When the advertisement was received
    pub timestamp: SystemTime,
    pub record: BeaconRecord,
}
