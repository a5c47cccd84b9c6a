//! Textual renderings of a UUID.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::uuid::{Uuid, UuidError};

/// The six presentations of one UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UuidFormats {
    pub standard: String,
    pub no_hyphens: String,
    pub uppercase: String,
    pub braces: String,
    pub urn: String,
    /// URL-safe alphabet without padding, always 22 characters.
    pub base64: String,
}

impl UuidFormats {
    pub fn new(uuid: &Uuid) -> Self {
        let standard = uuid.to_string();
        Self {
            no_hyphens: uuid.simple(),
            uppercase: standard.to_ascii_uppercase(),
            braces: format!("{{{standard}}}"),
            urn: format!("urn:uuid:{standard}"),
            base64: URL_SAFE_NO_PAD.encode(uuid.as_bytes()),
            standard,
        }
    }

    /// Field name and value pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("standard", self.standard.as_str()),
            ("noHyphens", self.no_hyphens.as_str()),
            ("uppercase", self.uppercase.as_str()),
            ("braces", self.braces.as_str()),
            ("urn", self.urn.as_str()),
            ("base64", self.base64.as_str()),
        ]
    }
}

impl From<&Uuid> for UuidFormats {
    fn from(uuid: &Uuid) -> Self {
        Self::new(uuid)
    }
}

/// Parse `input` in any accepted presentation and render all six forms.
pub fn format_uuid(input: &str) -> Result<UuidFormats, UuidError> {
    let uuid: Uuid = input.parse()?;
    Ok(UuidFormats::new(&uuid))
}

/// Recover a UUID from its 22-character base64 form.
pub fn from_base64(input: &str) -> Result<Uuid, UuidError> {
    let raw = URL_SAFE_NO_PAD
        .decode(input.trim())
        .map_err(|e| UuidError::InvalidFormat(e.to_string()))?;
    let bytes: [u8; 16] = raw.try_into().map_err(|v: Vec<u8>| {
        UuidError::InvalidFormat(format!("base64 decodes to {} bytes, expected 16", v.len()))
    })?;
    Ok(Uuid::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::generator::UuidGen;
    use crate::uuid::Version;

    #[test]
    fn test_known_vector() {
        let f = format_uuid("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(f.standard, "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(f.no_hyphens, "550e8400e29b41d4a716446655440000");
        assert_eq!(f.uppercase, "550E8400-E29B-41D4-A716-446655440000");
        assert_eq!(f.braces, "{550e8400-e29b-41d4-a716-446655440000}");
        assert_eq!(f.urn, "urn:uuid:550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(f.base64, "VQ6EAOKbQdSnFkRmVUQAAA");
    }

    #[test]
    fn test_consistency_and_round_trip_for_generated_values() {
        let mut g = UuidGen::new();
        for version in Version::ALL {
            for _ in 0..200 {
                let u = g.generate(version).unwrap();
                let f = UuidFormats::from(&u);
                assert_eq!(f.no_hyphens, f.standard.replace('-', ""));
                assert_eq!(f.uppercase, f.standard.to_uppercase());
                assert_eq!(f.braces, format!("{{{}}}", f.standard));
                assert_eq!(f.urn, format!("urn:uuid:{}", f.standard));
                assert_eq!(f.base64.len(), 22);
                assert!(!f.base64.contains('='));

                let d = decode(&f.standard);
                assert_eq!(d.uuid, Some(u));
                assert_eq!(d.version, Some(version.as_u8()));
                assert_eq!(from_base64(&f.base64).unwrap(), u);
                for (_, rendered) in f.entries() {
                    if rendered != f.base64 {
                        assert_eq!(decode(rendered).uuid, Some(u));
                    }
                }
            }
        }
    }

    #[test]
    fn test_base64_uses_url_safe_alphabet() {
        let f = UuidFormats::new(&Uuid::MAX);
        assert_eq!(f.base64, "_____________________w");
        assert_eq!(UuidFormats::new(&Uuid::NIL).base64, "AAAAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn test_format_rejects_invalid_input() {
        assert!(matches!(
            format_uuid("not-a-uuid"),
            Err(UuidError::InvalidFormat(_))
        ));
        assert!(from_base64("AAAA").is_err());
        assert!(from_base64("not base64!").is_err());
    }

    #[test]
    fn test_json_field_names() {
        let v = serde_json::to_value(UuidFormats::new(&Uuid::NIL)).unwrap();
        assert_eq!(v["noHyphens"], "00000000000000000000000000000000");
        assert_eq!(v.as_object().unwrap().len(), 6);
    }
}
