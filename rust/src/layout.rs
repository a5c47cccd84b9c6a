//! Bit layout shared by the generator and the decoder.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           v1: time_low          |  v7: unix_ts_ms (high 32)   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  v1: time_mid / v7: ts (low 16) |  ver  |  v1: time_hi / rand |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::uuid::UuidError;

/// Byte whose high nibble carries the version.
pub const VERSION_BYTE: usize = 6;

/// Byte whose leading bits carry the variant.
pub const VARIANT_BYTE: usize = 8;

/// 100 ns intervals between 1582-10-15T00:00:00Z and 1970-01-01T00:00:00Z.
pub const GREGORIAN_OFFSET_100NS: u64 = 0x01B2_1DD2_1381_4000;

/// 100 ns intervals per millisecond.
pub const TICKS_PER_MS: u64 = 10_000;

/// Largest value of the 60-bit v1 timestamp.
pub const MAX_V1_TICKS: u64 = (1 << 60) - 1;

/// Largest value of the 48-bit v7 `unix_ts_ms` field.
pub const MAX_UNIX_TS_MS: u64 = (1 << 48) - 1;

/// Variant family encoded in the leading bits of byte 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// `0xx`: reserved, NCS backward compatibility.
    #[serde(rename = "NCS")]
    Ncs,
    /// `10x`: the RFC 4122 layout.
    #[serde(rename = "RFC 4122")]
    Rfc4122,
    /// `110`: reserved, Microsoft backward compatibility.
    #[serde(rename = "Microsoft")]
    Microsoft,
    /// `111`: reserved for future definition.
    #[serde(rename = "Future")]
    Future,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ncs => "NCS",
            Self::Rfc4122 => "RFC 4122",
            Self::Microsoft => "Microsoft",
            Self::Future => "Future",
        }
    }

    /// Classifies a variant byte. The discriminators have different widths,
    /// so the match arms must stay in this order.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            x if x & 0x80 == 0x00 => Self::Ncs,
            x if x & 0xc0 == 0x80 => Self::Rfc4122,
            x if x & 0xe0 == 0xc0 => Self::Microsoft,
            _ => Self::Future,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stamps `nibble` into the version field.
pub fn set_version(bytes: &mut [u8; 16], nibble: u8) {
    bytes[VERSION_BYTE] = (bytes[VERSION_BYTE] & 0x0f) | (nibble << 4);
}

/// Stamps the `10` RFC 4122 variant bits.
pub fn set_rfc4122_variant(bytes: &mut [u8; 16]) {
    bytes[VARIANT_BYTE] = (bytes[VARIANT_BYTE] & 0x3f) | 0x80;
}

pub fn version_of(bytes: &[u8; 16]) -> u8 {
    bytes[VERSION_BYTE] >> 4
}

pub fn variant_of(bytes: &[u8; 16]) -> Variant {
    Variant::from_byte(bytes[VARIANT_BYTE])
}

/// Converts Unix milliseconds to 100 ns ticks since the Gregorian reform.
pub fn unix_ms_to_gregorian_ticks(unix_ts_ms: u64) -> Result<u64, UuidError> {
    unix_ts_ms
        .checked_mul(TICKS_PER_MS)
        .and_then(|t| t.checked_add(GREGORIAN_OFFSET_100NS))
        .filter(|t| *t <= MAX_V1_TICKS)
        .ok_or(UuidError::TimestampOverflow {
            version: 1,
            unix_ts_ms,
        })
}

/// Converts 60-bit Gregorian ticks back to Unix milliseconds. Ticks before
/// the Unix epoch produce negative values.
pub fn gregorian_ticks_to_unix_ms(ticks: u64) -> i64 {
    let ticks = (ticks & MAX_V1_TICKS) as i64;
    (ticks - GREGORIAN_OFFSET_100NS as i64).div_euclid(TICKS_PER_MS as i64)
}

/// Reads the 60-bit v1 timestamp, ignoring the version nibble.
pub fn v1_ticks(bytes: &[u8; 16]) -> u64 {
    let time_low = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64;
    let time_mid = u16::from_be_bytes([bytes[4], bytes[5]]) as u64;
    let time_hi = (u16::from_be_bytes([bytes[6], bytes[7]]) & 0x0fff) as u64;
    (time_hi << 48) | (time_mid << 32) | time_low
}

/// Writes a 60-bit v1 timestamp into bytes 0..8, leaving the version nibble
/// cleared.
pub fn write_v1_ticks(bytes: &mut [u8; 16], ticks: u64) {
    let time_low = ticks as u32;
    let time_mid = (ticks >> 32) as u16;
    let time_hi = ((ticks >> 48) & 0x0fff) as u16;
    bytes[0..4].copy_from_slice(&time_low.to_be_bytes());
    bytes[4..6].copy_from_slice(&time_mid.to_be_bytes());
    bytes[6..8].copy_from_slice(&time_hi.to_be_bytes());
}

/// Reads the 48-bit big-endian millisecond field from bytes 0..6.
pub fn v7_unix_ms(bytes: &[u8; 16]) -> u64 {
    bytes[..6]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | *b as u64)
}

/// Writes a 48-bit millisecond value into bytes 0..6.
pub fn write_v7_unix_ms(bytes: &mut [u8; 16], unix_ts_ms: u64) -> Result<(), UuidError> {
    if unix_ts_ms > MAX_UNIX_TS_MS {
        return Err(UuidError::TimestampOverflow {
            version: 7,
            unix_ts_ms,
        });
    }
    bytes[..6].copy_from_slice(&unix_ts_ms.to_be_bytes()[2..]);
    Ok(())
}
