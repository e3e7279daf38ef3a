//! Protocol decoders, one module per beacon family.
//!
//! Most decoders look at the payload of a single element. CJ Monitor spreads
//! its data over several elements and gets the whole sequence instead.

pub mod cj_monitor;
pub mod eddystone;
pub mod estimote;
pub mod exposure_notification;
pub mod ibeacon;
pub mod minew;

use crate::envelope::AdElement;
use crate::error::DecodeError;
use crate::record::BeaconRecord;

/// Decodes the payload of one element (after its UUID or company ID).
pub type ElementDecoder = fn(&[u8]) -> Result<BeaconRecord, DecodeError>;

/// Decodes a record assembled from every element of the advertisement.
pub type SequenceDecoder = fn(&[AdElement<'_>]) -> Result<BeaconRecord, DecodeError>;

/// Hex rendering used for opaque identifiers in property maps.
pub(crate) fn hex_string(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
