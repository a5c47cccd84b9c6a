//! Decoding and validation of user-supplied UUID text.
//!
//! [`decode`] never fails: malformed input is reported through
//! [`DecodedUuid::is_valid`] and a warning, not an error.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::{self, Variant};
use crate::uuid::{Uuid, UuidError, Version};

/// Earliest embedded timestamp treated as plausible (1970-01-01T00:00:00Z).
const PLAUSIBLE_MIN_MS: i64 = 0;

/// First embedded timestamp treated as implausible (2100-01-01T00:00:00Z).
const PLAUSIBLE_MAX_MS: i64 = 4_102_444_800_000;

static HEX32: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-f]{32}$").unwrap());

/// How serious a [`Warning`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Advisory note attached to a decode result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub severity: Severity,
    pub message: String,
}

impl Warning {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Presentation of the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    Standard,
    NoHyphens,
    Invalid,
}

impl InputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::NoHyphens => "no-hyphens",
            Self::Invalid => "invalid",
        }
    }
}

/// Analysis of one input string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedUuid {
    pub is_valid: bool,
    pub uuid: Option<Uuid>,
    pub version: Option<u8>,
    pub variant: Option<Variant>,
    pub timestamp: Option<DateTime<Utc>>,
    pub timestamp_ms: Option<i64>,
    pub random_bits: Option<u8>,
    pub format: InputFormat,
    pub warnings: Vec<Warning>,
}

impl DecodedUuid {
    fn invalid(message: String) -> Self {
        Self {
            is_valid: false,
            uuid: None,
            version: None,
            variant: None,
            timestamp: None,
            timestamp_ms: None,
            random_bits: None,
            format: InputFormat::Invalid,
            warnings: vec![Warning::new(Severity::Critical, message)],
        }
    }

    /// Highest severity among the warnings, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        let rank = |s: Severity| match s {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        };
        self.warnings.iter().map(|w| w.severity).min_by_key(|s| rank(*s))
    }
}

/// Reduces an input to bare lowercase hex: trims whitespace, lower-cases,
/// drops a `urn:uuid:` prefix, a matched pair of surrounding braces and
/// every hyphen. The prefix may sit outside or inside the braces.
pub fn normalize(input: &str) -> String {
    let lower = input.trim().to_ascii_lowercase();
    let s = strip_urn(&lower);
    let s = s
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .map(strip_urn)
        .unwrap_or(s);
    s.replace('-', "")
}

fn strip_urn(s: &str) -> &str {
    s.strip_prefix("urn:uuid:").unwrap_or(s)
}

/// Parses any accepted presentation into bytes plus the input's format.
pub(crate) fn parse_bytes(input: &str) -> Result<([u8; 16], InputFormat), UuidError> {
    let normalized = normalize(input);
    if normalized.is_empty() {
        return Err(UuidError::InvalidFormat(
            "input is empty; expected 32 hexadecimal characters".to_string(),
        ));
    }
    if !HEX32.is_match(&normalized) {
        let len = normalized.chars().count();
        let detail = if len == 32 {
            "input contains non-hexadecimal characters".to_string()
        } else {
            format!("expected 32 hexadecimal characters, found {len}")
        };
        return Err(UuidError::InvalidFormat(detail));
    }

    let mut bytes = [0u8; 16];
    hex::decode_to_slice(&normalized, &mut bytes)
        .map_err(|e| UuidError::InvalidFormat(e.to_string()))?;

    let format = if input.contains('-') {
        InputFormat::Standard
    } else {
        InputFormat::NoHyphens
    };
    Ok((bytes, format))
}

/// Decode `input` into a structured analysis.
pub fn decode(input: &str) -> DecodedUuid {
    let (bytes, format) = match parse_bytes(input) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(%err, "rejected uuid input");
            return DecodedUuid::invalid(err.to_string());
        }
    };

    let version = layout::version_of(&bytes);
    let variant = layout::variant_of(&bytes);
    let timestamp_ms = match version {
        1 => Some(layout::gregorian_ticks_to_unix_ms(layout::v1_ticks(&bytes))),
        7 => Some(layout::v7_unix_ms(&bytes) as i64),
        _ => None,
    };
    let timestamp = timestamp_ms.and_then(DateTime::<Utc>::from_timestamp_millis);
    let random_bits = Version::try_from(version)
        .ok()
        .and_then(Version::random_bits);

    let uuid = Uuid::from_bytes(bytes);
    let warnings = advisories(&uuid, version, variant, timestamp_ms);

    DecodedUuid {
        is_valid: true,
        uuid: Some(uuid),
        version: Some(version),
        variant: Some(variant),
        timestamp,
        timestamp_ms,
        random_bits,
        format,
        warnings,
    }
}

/// Whether `input` decodes to a well-formed UUID.
pub fn validate(input: &str) -> bool {
    parse_bytes(input).is_ok()
}

fn advisories(uuid: &Uuid, version: u8, variant: Variant, timestamp_ms: Option<i64>) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if *uuid == Uuid::NIL {
        warnings.push(Warning::new(Severity::Info, "This is the nil UUID (all bits zero)"));
        return warnings;
    }
    if *uuid == Uuid::MAX {
        warnings.push(Warning::new(Severity::Info, "This is the max UUID (all bits one)"));
        return warnings;
    }

    if variant != Variant::Rfc4122 {
        warnings.push(Warning::new(
            Severity::Info,
            format!("{variant} variant: the version field is not defined by RFC 4122 for this layout"),
        ));
    } else if !(1..=8).contains(&version) {
        warnings.push(Warning::new(
            Severity::Warning,
            format!("Unknown UUID version {version}"),
        ));
    }

    if version == 1 {
        warnings.push(Warning::new(
            Severity::Warning,
            "Version 1 UUIDs embed a node field that may expose the generating host's MAC address; prefer version 7 for new designs",
        ));
    }

    if let Some(ms) = timestamp_ms {
        if !(PLAUSIBLE_MIN_MS..PLAUSIBLE_MAX_MS).contains(&ms) {
            warnings.push(Warning::new(
                Severity::Info,
                format!("Embedded timestamp {ms} ms lies outside 1970-2100 and is probably not a real creation time"),
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_v4_vector() {
        let d = decode("550e8400-e29b-41d4-a716-446655440000");
        assert!(d.is_valid);
        assert_eq!(d.version, Some(4));
        assert_eq!(d.variant, Some(Variant::Rfc4122));
        assert_eq!(d.timestamp, None);
        assert_eq!(d.timestamp_ms, None);
        assert_eq!(d.random_bits, Some(122));
        assert_eq!(d.format, InputFormat::Standard);
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn test_known_v7_vector() {
        let d = decode("018bcfe5-6800-7000-8000-000000000000");
        assert!(d.is_valid);
        assert_eq!(d.version, Some(7));
        assert_eq!(d.timestamp_ms, Some(1_700_000_000_000));
        assert_eq!(
            d.timestamp.unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
        assert_eq!(d.random_bits, Some(74));
    }

    #[test]
    fn test_known_v1_vector() {
        let d = decode("C232AB00-9414-11EC-B3C8-9F6BDECED846");
        assert!(d.is_valid);
        assert_eq!(d.version, Some(1));
        assert_eq!(d.timestamp_ms, Some(1_645_557_742_000));
        assert_eq!(
            d.timestamp.unwrap().to_rfc3339(),
            "2022-02-22T19:22:22+00:00"
        );
        assert_eq!(d.random_bits, None);
        assert_eq!(d.warnings.len(), 1);
        assert_eq!(d.warnings[0].severity, Severity::Warning);
        assert!(d.warnings[0].message.contains("version 7"));
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["not-a-uuid", "", "   ", "550e8400-e29b-41d4-a716-44665544000z", "550e8400"] {
            let d = decode(input);
            assert!(!d.is_valid, "{input:?}");
            assert_eq!(d.version, None);
            assert_eq!(d.variant, None);
            assert_eq!(d.timestamp_ms, None);
            assert_eq!(d.random_bits, None);
            assert_eq!(d.format, InputFormat::Invalid);
            assert_eq!(d.warnings.len(), 1);
            assert_eq!(d.warnings[0].severity, Severity::Critical);
        }
        assert!(decode("").warnings[0].message.contains("empty"));
        assert!(decode("550e8400").warnings[0].message.contains("found 8"));
    }

    #[test]
    fn test_format_reflects_original_input() {
        assert_eq!(
            decode("550e8400e29b41d4a716446655440000").format,
            InputFormat::NoHyphens
        );
        assert_eq!(
            decode("{550e8400e29b41d4a716446655440000}").format,
            InputFormat::NoHyphens
        );
        assert_eq!(
            decode("URN:UUID:550e8400-e29b-41d4-a716-446655440000").format,
            InputFormat::Standard
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(" {URN:UUID:550E8400-E29B-41D4-A716-446655440000} "),
            "550e8400e29b41d4a716446655440000"
        );
        assert_eq!(normalize("ab-cd"), "abcd");
    }

    #[test]
    fn test_braces_and_urn_prefix_in_either_order() {
        let expected = "550e8400e29b41d4a716446655440000";
        for input in [
            "urn:uuid:{550e8400-e29b-41d4-a716-446655440000}",
            "{urn:uuid:550e8400-e29b-41d4-a716-446655440000}",
            "URN:UUID:{550E8400-E29B-41D4-A716-446655440000}",
        ] {
            assert_eq!(normalize(input), expected, "{input}");
            assert!(validate(input), "{input}");
        }
    }

    #[test]
    fn test_unmatched_brace_is_rejected() {
        for input in [
            "{550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-446655440000}",
            "urn:uuid:{550e8400-e29b-41d4-a716-446655440000",
        ] {
            let d = decode(input);
            assert!(!d.is_valid, "{input}");
            assert_eq!(d.warnings[0].severity, Severity::Critical);
        }
    }

    #[test]
    fn test_any_version_nibble_is_reported() {
        for v in 0..16u8 {
            let s = format!("00000001-0000-{v:x}000-8000-000000000000");
            let d = decode(&s);
            assert!(d.is_valid);
            assert_eq!(d.version, Some(v));
        }
        let d = decode("00000001-0000-f000-8000-000000000000");
        assert!(d.warnings.iter().any(|w| w.message.contains("Unknown UUID version 15")));
    }

    #[test]
    fn test_non_rfc_variants() {
        let cases = [
            ("00000001-0000-4000-0000-000000000000", Variant::Ncs),
            ("00000001-0000-4000-7fff-000000000000", Variant::Ncs),
            ("00000001-0000-4000-c000-000000000000", Variant::Microsoft),
            ("00000001-0000-4000-e000-000000000000", Variant::Future),
        ];
        for (s, variant) in cases {
            let d = decode(s);
            assert_eq!(d.variant, Some(variant), "{s}");
            assert!(d.warnings.iter().any(|w| w.severity == Severity::Info));
        }
    }

    #[test]
    fn test_nil_and_max() {
        let nil = decode("00000000-0000-0000-0000-000000000000");
        assert!(nil.is_valid);
        assert_eq!(nil.version, Some(0));
        assert_eq!(nil.variant, Some(Variant::Ncs));
        assert!(nil.warnings[0].message.contains("nil"));

        let max = decode("ffffffff-ffff-ffff-ffff-ffffffffffff");
        assert_eq!(max.version, Some(15));
        assert_eq!(max.variant, Some(Variant::Future));
        assert!(max.warnings[0].message.contains("max"));
    }

    #[test]
    fn test_implausible_timestamps_are_best_effort() {
        // v1 with zero ticks: 1582-10-15
        let d = decode("00000000-0000-1000-8000-000000000001");
        assert!(d.is_valid);
        assert_eq!(d.timestamp_ms, Some(-12_219_292_800_000));
        assert!(d.timestamp.is_some());
        assert!(d.warnings.iter().any(|w| w.message.contains("outside 1970-2100")));

        // v7 with the largest 48-bit value
        let d = decode("ffffffff-ffff-7000-8000-000000000000");
        assert_eq!(d.timestamp_ms, Some((1i64 << 48) - 1));
        assert!(d.timestamp.is_some());
        assert_eq!(d.worst_severity(), Some(Severity::Info));
    }

    #[test]
    fn test_validate() {
        assert!(validate("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!validate("not-a-uuid"));
    }

    #[test]
    fn test_json_shape() {
        let v = serde_json::to_value(decode("550e8400-e29b-41d4-a716-446655440000")).unwrap();
        assert_eq!(v["isValid"], true);
        assert_eq!(v["version"], 4);
        assert_eq!(v["variant"], "RFC 4122");
        assert_eq!(v["format"], "standard");
        assert_eq!(v["randomBits"], 122);
        assert!(v["timestampMs"].is_null());

        let v = serde_json::to_value(decode("bad")).unwrap();
        assert_eq!(v["format"], "invalid");
        assert_eq!(v["warnings"][0]["severity"], "critical");
    }
}
