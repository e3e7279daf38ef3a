//! Advertisement envelope: the length-type-value framing of AD structures.
//!
//! Each element is one length byte `L`, then a type byte and `L - 1` value
//! bytes. Elements borrow from the input buffer and never outlive it.

use crate::constants::{MANUFACTURER_SPECIFIC_DATA_TYPE, SERVICE_DATA_TYPE};

/// One AD structure of an advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdElement<'a> {
    /// AD type code
    pub ad_type: u8,
    /// Element payload following the type byte
    pub value: &'a [u8],
}

/// Service data keyed by a 16-bit service UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceData<'a> {
    pub service_identifier: u16,
    pub service_data: &'a [u8],
}

/// Manufacturer specific data keyed by a company identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerData<'a> {
    pub company_identifier: u16,
    pub data: &'a [u8],
}

/// Split a 16-bit little-endian key off the front of `value`.
fn split_key(value: &[u8]) -> Option<(u16, &[u8])> {
    match value {
        [lo, hi, rest @ ..] => Some((u16::from_le_bytes([*lo, *hi]), rest)),
        _ => None,
    }
}

impl<'a> AdElement<'a> {
    /// View this element as service data, if it is one and carries a UUID.
    pub fn service_data(&self) -> Option<ServiceData<'a>> {
        if self.ad_type != SERVICE_DATA_TYPE {
            return None;
        }
        split_key(self.value).map(|(service_identifier, service_data)| ServiceData {
            service_identifier,
            service_data,
        })
    }

    /// View this element as manufacturer data, if it is one and carries a company ID.
    pub fn manufacturer_data(&self) -> Option<ManufacturerData<'a>> {
        if self.ad_type != MANUFACTURER_SPECIFIC_DATA_TYPE {
            return None;
        }
        split_key(self.value).map(|(company_identifier, data)| ManufacturerData {
            company_identifier,
            data,
        })
    }
}

/// Iterator over the AD structures of an advertisement buffer.
///
/// Iteration ends at the end of the buffer, at a zero length byte (the padding
/// of legacy advertisements), or at an element that overruns the buffer. In the
/// last case the partial element is dropped and [`AdElements::is_truncated`]
/// reports it.
#[derive(Debug, Clone)]
pub struct AdElements<'a> {
    data: &'a [u8],
    offset: usize,
    truncated_at: Option<usize>,
}

impl<'a> AdElements<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            truncated_at: None,
        }
    }

    /// Whether iteration stopped on an element that did not fit the buffer.
    pub fn is_truncated(&self) -> bool {
        self.truncated_at.is_some()
    }

    /// Offset of the length byte of the element that did not fit, if any.
    pub fn truncated_at(&self) -> Option<usize> {
        self.truncated_at
    }

    fn stop(&mut self) {
        self.offset = self.data.len();
    }
}

impl<'a> Iterator for AdElements<'a> {
    type Item = AdElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset;
        let len = usize::from(*self.data.get(start)?);
        if len == 0 {
            self.stop();
            return None;
        }

        let end = start + 1 + len;
        if end > self.data.len() {
            log::debug!(
                "AD element at offset {start} claims {len} bytes, only {} left",
                self.data.len() - start - 1
            );
            self.truncated_at = Some(start);
            self.stop();
            return None;
        }

        self.offset = end;
        Some(AdElement {
            ad_type: self.data[start + 1],
            value: &self.data[start + 2..end],
        })
    }
}

impl std::iter::FusedIterator for AdElements<'_> {}

/// Iterate the AD structures of `data`.
pub fn elements(data: &[u8]) -> AdElements<'_> {
    AdElements::new(data)
}
