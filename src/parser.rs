//! Dispatch of advertisement elements to protocol decoders.
//!
//! Service data is routed by its 16-bit UUID, manufacturer data by company
//! ID, and the Minew S1 frame by its AD type. The first element with a known
//! key decides the outcome of the whole packet.

use crate::constants::{
    CJ_MANUFACTURER_ID, EDDYSTONE_UUID, ESTIMOTE_MANUFACTURER_ID, ESTIMOTE_UUID,
    EXPOSURE_NOTIFICATION_UUID, IBEACON_MANUFACTURER_ID, MANUFACTURER_SPECIFIC_DATA_TYPE,
    MINEW_S1_TYPE, SERVICE_DATA_TYPE,
};
use crate::decoders::{
    ElementDecoder, SequenceDecoder, cj_monitor, eddystone, estimote, exposure_notification,
    ibeacon, minew,
};
use crate::envelope::{AdElement, AdElements};
use crate::error::DecodeError;
use crate::record::BeaconRecord;

/// How a matched element is turned into a record.
#[derive(Clone, Copy)]
enum Route {
    /// Decode the element payload following its key.
    Element(ElementDecoder),
    /// Decode from the complete element sequence.
    Sequence(SequenceDecoder),
}

/// Service data decoders keyed by service UUID.
const SERVICE_DATA_DECODERS: &[(u16, Route)] = &[
    (EDDYSTONE_UUID, Route::Element(eddystone::decode)),
    (ESTIMOTE_UUID, Route::Element(estimote::decode_telemetry)),
    (
        EXPOSURE_NOTIFICATION_UUID,
        Route::Element(exposure_notification::decode),
    ),
];

/// Manufacturer data decoders keyed by company identifier.
const MANUFACTURER_DATA_DECODERS: &[(u16, Route)] = &[
    (ESTIMOTE_MANUFACTURER_ID, Route::Element(estimote::decode_nearable)),
    (CJ_MANUFACTURER_ID, Route::Sequence(cj_monitor::decode)),
    (IBEACON_MANUFACTURER_ID, Route::Element(ibeacon::decode)),
];

/// Decoders for vendor AD types whose whole value is the frame.
const AD_TYPE_DECODERS: &[(u8, Route)] = &[(MINEW_S1_TYPE, Route::Element(minew::decode))];

fn lookup<K: PartialEq>(table: &[(K, Route)], key: K) -> Option<Route> {
    table
        .iter()
        .find_map(|(candidate, route)| (*candidate == key).then_some(*route))
}

/// Find the decoder for one element and the payload it should get.
fn route<'a>(element: &AdElement<'a>) -> Option<(Route, &'a [u8])> {
    match element.ad_type {
        SERVICE_DATA_TYPE => {
            let service = element.service_data()?;
            lookup(SERVICE_DATA_DECODERS, service.service_identifier)
                .map(|route| (route, service.service_data))
        }
        MANUFACTURER_SPECIFIC_DATA_TYPE => {
            let manufacturer = element.manufacturer_data()?;
            lookup(MANUFACTURER_DATA_DECODERS, manufacturer.company_identifier)
                .map(|route| (route, manufacturer.data))
        }
        ad_type => lookup(AD_TYPE_DECODERS, ad_type).map(|route| (route, element.value)),
    }
}

/// Decode an advertisement payload, reporting why it was not recognized.
///
/// The payload is the AD structure data of one advertising report, without
/// HCI or link-layer framing.
pub fn decode_packet(packet: &[u8]) -> Result<BeaconRecord, DecodeError> {
    let mut reader = AdElements::new(packet);
    let elements: Vec<AdElement<'_>> = reader.by_ref().collect();
    if let Some(offset) = reader.truncated_at() {
        return Err(DecodeError::MalformedEnvelope { offset });
    }

    for element in &elements {
        let Some((route, payload)) = route(element) else {
            log::trace!("skipping AD element of type 0x{:02x}", element.ad_type);
            continue;
        };

        let result = match route {
            Route::Element(decode) => decode(payload),
            Route::Sequence(decode) => decode(&elements),
        };
        if let Err(e) = &result {
            log::debug!("recognized element did not decode: {e}");
        }
        return result;
    }

    Err(DecodeError::Unrecognized)
}

/// Decode an advertisement payload into a beacon record.
///
/// Returns `None` for anything that is not one of the supported beacon
/// formats, including malformed and truncated packets.
///
/// # Example
/// ```
/// use beacon_decoder::{BeaconRecord, parse_packet};
///
/// let packet = [
///     0x03, 0x03, 0xAA, 0xFE, // complete list of 16-bit UUIDs: Eddystone
///     0x0A, 0x16, 0xAA, 0xFE, // service data: Eddystone
///     0x10, 0xF8, 0x03, b'a', b'b', b'c', 0x07, // URL frame
/// ];
/// match parse_packet(&packet) {
///     Some(BeaconRecord::EddystoneUrl(frame)) => assert_eq!(frame.url, "https://abc.com"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn parse_packet(packet: &[u8]) -> Option<BeaconRecord> {
    decode_packet(packet).ok()
}
