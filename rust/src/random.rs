//! Entropy sources used by the generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::uuid::UuidError;

/// The minimum interface the generator needs from a random number source.
pub trait RandomSource {
    /// Fills `dest` with random data, or reports why it could not.
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<(), UuidError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<(), UuidError> {
        getrandom::fill(dest).map_err(|e| UuidError::Entropy(e.to_string()))
    }
}

/// A deterministic source for reproducible tests and fixtures.
#[derive(Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<(), UuidError> {
        self.0.fill_bytes(dest);
        Ok(())
    }
}

/// Builds the PRNG used when the primary source fails. It is seeded from the
/// clock, the process id and a per-process counter, so it is unique but not
/// unpredictable.
pub(crate) fn fallback_rng() -> StdRng {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let pid = std::process::id() as u64;
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    StdRng::seed_from_u64(nanos ^ pid.rotate_left(32) ^ count.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}
