//! uuidkit: UUID generation, rendering and decoding.
//!
//! Generates RFC 4122 versions 1, 4 and 7, renders any UUID in six textual
//! forms and decodes arbitrary user text into a structured analysis.
//!
//! # Example
//!
//! ```
//! use uuidkit::{Version, decode_uuid, format_uuid, generate_uuid};
//!
//! let id = generate_uuid(Version::V7).expect("clock within the 48-bit range");
//! let forms = format_uuid(&id).expect("generated ids always parse");
//! println!("{}", forms.base64); // e.g. "AYvP5WgAd8qRKm9aXl4hPQ"
//!
//! let decoded = decode_uuid(&id);
//! assert!(decoded.is_valid);
//! assert_eq!(decoded.version, Some(7));
//! ```

mod async_api;
mod decode;
mod format;
mod generator;
mod history;
pub mod layout;
mod random;
mod uuid;

pub use async_api::{BULK_YIELD_EVERY, async_generate_bulk, async_generate_uuid};
pub use decode::{DecodedUuid, InputFormat, Severity, Warning, decode, normalize, validate};
pub use format::{UuidFormats, format_uuid, from_base64};
pub use generator::{UuidGen, generate_bulk, generate_uuid, is_degraded};
pub use history::{HISTORY_CAPACITY, History, HistoryEntry, Session};
pub use layout::Variant;
pub use random::{OsRandom, RandomSource, SeededRandom};
pub use uuid::{Uuid, UuidError, Version};

/// Decode arbitrary text into a [`DecodedUuid`]; alias of [`decode`].
pub fn decode_uuid(input: &str) -> DecodedUuid {
    decode(input)
}
