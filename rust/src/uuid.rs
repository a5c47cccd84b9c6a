//! The 16-byte UUID value, supported versions and crate errors.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::decode::parse_bytes;
use crate::layout::{self, Variant};

/// Errors that can occur during UUID operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UuidError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
    #[error("Unsupported UUID version: {0} (expected 1, 4 or 7)")]
    UnsupportedVersion(u8),
    #[error("Timestamp {unix_ts_ms} ms does not fit the version {version} time field")]
    TimestampOverflow { version: u8, unix_ts_ms: u64 },
    #[error("Entropy source failure: {0}")]
    Entropy(String),
}

/// UUID versions this crate generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Version {
    /// Gregorian timestamp, random node.
    V1 = 1,
    /// Random.
    V4 = 4,
    /// Unix millisecond timestamp.
    V7 = 7,
}

impl Version {
    pub const ALL: [Version; 3] = [Version::V1, Version::V4, Version::V7];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Fixed count of random bits the layout reserves, where documented.
    pub fn random_bits(self) -> Option<u8> {
        match self {
            Self::V4 => Some(122),
            Self::V7 => Some(74),
            Self::V1 => None,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = UuidError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            4 => Ok(Self::V4),
            7 => Ok(Self::V7),
            other => Err(UuidError::UnsupportedVersion(other)),
        }
    }
}

impl From<Version> for u8 {
    fn from(v: Version) -> Self {
        v.as_u8()
    }
}

impl FromStr for Version {
    type Err = UuidError;

    /// Accepts `"4"`, `"v4"` or `"V4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);
        let n: u8 = digits
            .parse()
            .map_err(|_| UuidError::InvalidFormat(format!("not a version number: {s}")))?;
        Self::try_from(n)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}

/// A Universally Unique IDentifier stored as 16 big-endian bytes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Raw version nibble (0-15).
    pub fn version_nibble(&self) -> u8 {
        layout::version_of(&self.0)
    }

    pub fn variant(&self) -> Variant {
        layout::variant_of(&self.0)
    }

    /// Lowercase 32-digit hex without hyphens.
    pub fn simple(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Uuid {
    /// Writes the 8-4-4-4-12 lowercase representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.simple();
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &h[0..8],
            &h[8..12],
            &h[12..16],
            &h[16..20],
            &h[20..32]
        )
    }
}

impl FromStr for Uuid {
    type Err = UuidError;

    /// Parses any presentation the decoder accepts (hyphenated, bare hex,
    /// braces, `urn:uuid:` prefix, either case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bytes(s).map(|(bytes, _)| Self(bytes))
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Uuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
