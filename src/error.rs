//! Reasons an advertisement could not be turned into a beacon record.

use thiserror::Error;

/// Error types for decoding beacon advertisements.
///
/// None of these are fatal: [`crate::parse_packet`] folds every variant into
/// `None` so a scanning loop can keep going after any single bad packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A length byte claims more data than the buffer holds.
    #[error("Malformed envelope: element at offset {offset} overruns the buffer")]
    MalformedEnvelope { offset: usize },
    /// No element carries a known service UUID, company ID or type code.
    #[error("Unrecognized advertisement")]
    Unrecognized,
    /// A known protocol was matched but its frame type is not supported.
    #[error("Unsupported {protocol} frame type 0x{frame_type:02x}")]
    UnsupportedFrame {
        protocol: &'static str,
        frame_type: u8,
    },
    /// A known protocol was matched but the payload is shorter than its layout.
    #[error("{protocol} payload too short: need {needed} bytes, got {actual}")]
    TooShort {
        protocol: &'static str,
        needed: usize,
        actual: usize,
    },
}
