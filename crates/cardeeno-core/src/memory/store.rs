//! Addressable store for per-(user, card) review state.
//!
//! Pure data with invariant enforcement only; all mutation is funneled
//! through the [`MemoryTracker`](crate::memory::MemoryTracker). Entries are
//! locked per key, so writes for different (user, card) pairs never block
//! each other, while two outcomes for the same key apply strictly in
//! arrival order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{CardeenoError, CardeenoResult};
use crate::types::MemoryEntry;

/// Key addressing one (user, card) review state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryKey {
    /// Identity of the user.
    pub user_id: String,
    /// Identity of the card.
    pub card_id: String,
}

impl MemoryKey {
    /// Create a new key.
    pub fn new(user_id: impl Into<String>, card_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            card_id: card_id.into(),
        }
    }
}

/// In-process store of memory entries, keyed by (user, card).
///
/// The outer map lock is held only long enough to look up or create the
/// per-key slot; entry mutation happens under the per-key mutex.
pub struct MemoryStore {
    entries: RwLock<HashMap<MemoryKey, Arc<Mutex<MemoryEntry>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get a snapshot of the entry for a key, if present.
    pub fn get(&self, user_id: &str, card_id: &str) -> CardeenoResult<Option<MemoryEntry>> {
        let key = MemoryKey::new(user_id, card_id);
        let slot = {
            let entries = self
                .entries
                .read()
                .map_err(|e| CardeenoError::internal(e.to_string()))?;
            entries.get(&key).cloned()
        };
        match slot {
            Some(slot) => {
                let entry = slot
                    .lock()
                    .map_err(|e| CardeenoError::internal(e.to_string()))?;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    /// Seed a key with an entry loaded from persistence.
    ///
    /// Keeps the existing entry if the key is already present, so a
    /// hydration race can never clobber a newer in-process state.
    pub fn insert_if_absent(&self, entry: MemoryEntry) -> CardeenoResult<()> {
        let key = MemoryKey::new(&entry.user_id, &entry.card_id);
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        entries
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(entry)));
        Ok(())
    }

    /// Apply an update to the entry for a key, creating it first if absent.
    ///
    /// `seed` produces the initial entry for a never-reviewed key; `apply`
    /// computes the updated entry from the current one. Returns a snapshot
    /// of the entry after the update.
    pub fn update_or_insert_with(
        &self,
        user_id: &str,
        card_id: &str,
        seed: impl FnOnce() -> MemoryEntry,
        apply: impl FnOnce(&MemoryEntry) -> MemoryEntry,
    ) -> CardeenoResult<MemoryEntry> {
        let key = MemoryKey::new(user_id, card_id);
        let slot = {
            let mut entries = self
                .entries
                .write()
                .map_err(|e| CardeenoError::internal(e.to_string()))?;
            entries
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(seed())))
                .clone()
        };

        let mut entry = slot
            .lock()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        *entry = apply(&entry);
        Ok(entry.clone())
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
