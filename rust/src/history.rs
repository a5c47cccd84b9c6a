//! Bounded generation history and the session context that owns it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::generator::UuidGen;
use crate::random::{OsRandom, RandomSource};
use crate::uuid::{Uuid, UuidError, Version};

/// Default number of entries a [`History`] retains.
pub const HISTORY_CAPACITY: usize = 20;

/// One recorded generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub uuid: Uuid,
    pub version: Version,
    pub generated_at: DateTime<Utc>,
}

/// FIFO ring buffer of recent generations; the oldest entry is evicted once
/// `capacity` is reached.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// Create a history holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an entry, evicting the oldest one when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

/// A generator together with the history of what it produced.
///
/// ```
/// use uuidkit::{Session, Version};
///
/// let mut session = Session::new();
/// let id = session.generate(Version::V4).expect("v4 has no clock bounds");
/// assert_eq!(session.history().latest().map(|e| e.uuid.to_string()), Some(id));
/// ```
#[derive(Debug)]
pub struct Session<R = OsRandom> {
    generator: UuidGen<R>,
    history: History,
}

impl Session<OsRandom> {
    pub fn new() -> Self {
        Self::with_generator(UuidGen::new(), History::default())
    }
}

impl Default for Session<OsRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Session<R> {
    pub fn with_generator(generator: UuidGen<R>, history: History) -> Self {
        Self { generator, history }
    }

    /// Generate one UUID, record it and return its standard form.
    pub fn generate(&mut self, version: Version) -> Result<String, UuidError> {
        let uuid = self.generator.generate(version)?;
        self.history.push(HistoryEntry {
            uuid,
            version,
            generated_at: Utc::now(),
        });
        Ok(uuid.to_string())
    }

    /// Generate `count` independent UUIDs. Bulk output is not recorded.
    pub fn generate_bulk(&mut self, version: Version, count: usize) -> Result<Vec<String>, UuidError> {
        self.generator
            .generate_n(version, count)
            .map(|v| v.into_iter().map(String::from).collect())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn generator(&self) -> &UuidGen<R> {
        &self.generator
    }
}
