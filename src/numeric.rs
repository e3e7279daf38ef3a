//! Shared byte cursor and fixed-point conversions used by the decoders.
//!
//! Fixed-point values are converted exactly: dividing by a power of two is
//! lossless in `f64` for every 16-bit input, so no rounding takes place.

use crate::error::DecodeError;

/// Bounds-checked cursor over a decoder's input.
///
/// Every read that would run past the end returns [`DecodeError::TooShort`]
/// naming the protocol being decoded, so decoders never index slices directly.
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    protocol: &'static str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(protocol: &'static str, data: &'a [u8]) -> Self {
        Self {
            protocol,
            data,
            pos: 0,
        }
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + len;
        if end > self.data.len() {
            return Err(DecodeError::TooShort {
                protocol: self.protocol,
                needed: end,
                actual: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    pub(crate) fn i8(&mut self) -> Result<i8, DecodeError> {
        Ok(i8::from_be_bytes(self.array()?))
    }

    pub(crate) fn u16_be(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub(crate) fn i16_be(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    pub(crate) fn u16_le(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub(crate) fn i16_le(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.array()?))
    }

    pub(crate) fn u32_be(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// Next byte if one is left, for trailing fields some firmware omits.
    pub(crate) fn optional_u8(&mut self) -> Option<u8> {
        self.u8().ok()
    }

    /// Everything not consumed yet.
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }
}

/// Signed 8.8 fixed point (integer byte, then 1/256 fraction byte) to a float.
pub fn signed_8_8(raw: i16) -> f64 {
    f64::from(raw) / 256.0
}

/// Sign-extend the low `bits` bits of `value` as a two's complement integer.
///
/// `bits` is clamped to `1..=32`.
pub(crate) fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits.clamp(1, 32);
    ((value << shift) as i32) >> shift
}

/// Signed 12-bit value with four fractional bits (1/16 units) to a float.
///
/// Only the low 12 bits of `raw` are used.
pub fn signed_12_4(raw: u16) -> f64 {
    f64::from(sign_extend(u32::from(raw & 0x0FFF), 12)) / 16.0
}
