//! UUID v1/v4/v7 generation.
//!
//! Version 1 values carry a Gregorian timestamp but no hardware address: the
//! clock sequence and node bytes are random, so a generated value does not
//! identify the host that produced it.

use rand::Rng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{trace, warn};

use crate::layout;
use crate::random::{OsRandom, RandomSource, fallback_rng};
use crate::uuid::{Uuid, UuidError, Version};

thread_local! {
    static DEFAULT_GENERATOR: RefCell<UuidGen<OsRandom>> = RefCell::new(UuidGen::new());
}

/// Generate one UUID in its standard form using a thread-local generator.
pub fn generate_uuid(version: Version) -> Result<String, UuidError> {
    DEFAULT_GENERATOR.with(|g| g.borrow_mut().generate(version).map(String::from))
}

/// Generate `count` independent UUIDs in standard form.
pub fn generate_bulk(version: Version, count: usize) -> Result<Vec<String>, UuidError> {
    DEFAULT_GENERATOR.with(|g| {
        let mut g = g.borrow_mut();
        (0..count)
            .map(|_| g.generate(version).map(String::from))
            .collect()
    })
}

/// Whether the thread-local generator behind [`generate_uuid`] and
/// [`generate_bulk`] has fallen back to non-cryptographic randomness.
pub fn is_degraded() -> bool {
    DEFAULT_GENERATOR.with(|g| g.borrow().is_degraded())
}

/// UUID generator over a pluggable random source.
///
/// ```
/// use uuidkit::{UuidGen, Version};
///
/// let mut uuid_gen = UuidGen::new();
/// let uuid = uuid_gen.generate(Version::V7).expect("clock within range");
/// println!("{}", uuid); // e.g. "018bcfe5-6800-7a3c-9f21-4be0c1d2e3f4"
/// ```
#[derive(Debug)]
pub struct UuidGen<R = OsRandom> {
    rng: R,
    fallback: Option<StdRng>,
}

impl UuidGen<OsRandom> {
    /// Create a generator backed by the operating system CSPRNG.
    pub fn new() -> Self {
        Self::with_source(OsRandom)
    }
}

impl Default for UuidGen<OsRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> UuidGen<R> {
    /// Create a generator with a chosen random source.
    pub fn with_source(rng: R) -> Self {
        Self {
            rng,
            fallback: None,
        }
    }

    /// True once the primary source has failed and values are being drawn
    /// from the non-cryptographic fallback.
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }

    /// Generate a UUID of `version` stamped with the current wall clock.
    pub fn generate(&mut self, version: Version) -> Result<Uuid, UuidError> {
        self.generate_at(version, current_unix_ms())
    }

    /// Generate a UUID of `version` for an explicit Unix millisecond
    /// reading. The reading is ignored for version 4.
    pub fn generate_at(&mut self, version: Version, unix_ts_ms: u64) -> Result<Uuid, UuidError> {
        let mut bytes = [0u8; 16];
        self.fill(&mut bytes);

        match version {
            Version::V1 => {
                let ticks = layout::unix_ms_to_gregorian_ticks(unix_ts_ms)?;
                layout::write_v1_ticks(&mut bytes, ticks);
            }
            Version::V4 => {}
            Version::V7 => layout::write_v7_unix_ms(&mut bytes, unix_ts_ms)?,
        }
        layout::set_version(&mut bytes, version.as_u8());
        layout::set_rfc4122_variant(&mut bytes);

        let uuid = Uuid::from_bytes(bytes);
        trace!(%uuid, %version, "generated uuid");
        Ok(uuid)
    }

    /// Generate `count` independent UUIDs.
    pub fn generate_n(&mut self, version: Version, count: usize) -> Result<Vec<Uuid>, UuidError> {
        (0..count).map(|_| self.generate(version)).collect()
    }

    fn fill(&mut self, bytes: &mut [u8; 16]) {
        if let Some(rng) = self.fallback.as_mut() {
            rng.fill_bytes(bytes);
            return;
        }
        if let Err(err) = self.rng.try_fill(bytes) {
            warn!(%err, "entropy source failed, switching to degraded fallback randomness");
            let mut rng = fallback_rng();
            rng.fill_bytes(bytes);
            self.fallback = Some(rng);
        }
    }
}

/// Milliseconds since the Unix epoch; a clock set before 1970 reads as zero.
pub(crate) fn current_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
