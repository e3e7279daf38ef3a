//! Identifiers and bit layouts of the supported beacon protocols.
//!
//! Service UUIDs and company identifiers are given as the 16-bit values they
//! represent; both are transmitted little-endian inside the advertisement.

/// AD type carrying the complete local name of the device.
pub const COMPLETE_LOCAL_NAME_TYPE: u8 = 0x09;

/// AD type for 16-bit UUID service data.
pub const SERVICE_DATA_TYPE: u8 = 0x16;

/// AD type for manufacturer specific data.
pub const MANUFACTURER_SPECIFIC_DATA_TYPE: u8 = 0xFF;

/// AD type code the Minew S1 sensor frame is carried under.
pub const MINEW_S1_TYPE: u8 = 0xA1;

/// Eddystone service UUID (`AA FE` on the wire).
pub const EDDYSTONE_UUID: u16 = 0xFEAA;

/// Estimote service UUID (`9A FE` on the wire).
pub const ESTIMOTE_UUID: u16 = 0xFE9A;

/// Google/Apple Exposure Notification service UUID (`6F FD` on the wire).
pub const EXPOSURE_NOTIFICATION_UUID: u16 = 0xFD6F;

/// Estimote, Inc.
pub const ESTIMOTE_MANUFACTURER_ID: u16 = 0x015D;

/// Control-J Pty Ltd.
pub const CJ_MANUFACTURER_ID: u16 = 0x0272;

/// Apple, Inc. (iBeacon).
pub const IBEACON_MANUFACTURER_ID: u16 = 0x004C;

pub const EDDYSTONE_UID_FRAME: u8 = 0x00;
pub const EDDYSTONE_URL_FRAME: u8 = 0x10;
pub const EDDYSTONE_TLM_FRAME: u8 = 0x20;
pub const EDDYSTONE_EID_FRAME: u8 = 0x30;

pub const EDDYSTONE_TLM_UNENCRYPTED: u8 = 0x00;
pub const EDDYSTONE_TLM_ENCRYPTED: u8 = 0x01;

/// URL scheme prefixes, indexed by the scheme byte.
pub const EDDYSTONE_URL_SCHEMES: [&str; 4] = ["http://www.", "https://www.", "http://", "https://"];

/// Expansion codes for the encoded URL body, indexed by the byte value.
pub const EDDYSTONE_TLD_ENCODINGS: [&str; 14] = [
    ".com/", ".org/", ".edu/", ".net/", ".info/", ".biz/", ".gov/", ".com", ".org", ".edu",
    ".net", ".info", ".biz", ".gov",
];

/// Low nibble of the Estimote frame type byte selects the frame kind.
pub const ESTIMOTE_FRAME_KIND_MASK: u8 = 0x0F;
/// High nibble of the Estimote frame type byte carries the protocol version.
pub const ESTIMOTE_PROTOCOL_VERSION_MASK: u8 = 0xF0;
pub const ESTIMOTE_PROTOCOL_VERSION_SHIFT: u8 = 4;

pub const ESTIMOTE_NEARABLE_FRAME: u8 = 0x1;
pub const ESTIMOTE_TELEMETRY_FRAME: u8 = 0x2;

pub const ESTIMOTE_TELEMETRY_SUBFRAME_A: u8 = 0x00;
pub const ESTIMOTE_TELEMETRY_SUBFRAME_B: u8 = 0x01;

/// iBeacon type and remaining length bytes following the Apple company ID.
pub const IBEACON_PROXIMITY_TYPE: [u8; 2] = [0x02, 0x15];
