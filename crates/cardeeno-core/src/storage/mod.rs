//! In-memory reference implementation of the storage collaborators.
//!
//! Backs the integration tests and doc examples, and is good enough for
//! embedding the core into a single-process app. Production deployments
//! implement [`SetRepository`] and [`ProgressStore`] over their own
//! database.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{CardeenoError, CardeenoResult};
use crate::traits::{ProgressStore, SetRepository};
use crate::types::{Card, MemoryEntry, SessionSummary, StudySet};

/// In-memory storage for sets, memory entries, and session summaries.
pub struct InMemoryStorage {
    sets: RwLock<HashMap<String, StudySet>>,
    entries: RwLock<HashMap<(String, String), MemoryEntry>>,
    summaries: RwLock<Vec<SessionSummary>>,
}

impl InMemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
            entries: RwLock::new(HashMap::new()),
            summaries: RwLock::new(Vec::new()),
        }
    }

    /// Insert or replace a study set.
    pub fn insert_set(&self, set: StudySet) {
        if let Ok(mut sets) = self.sets.write() {
            sets.insert(set.id.clone(), set);
        }
    }

    /// Snapshot of all persisted session summaries, in save order.
    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.summaries
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Number of persisted memory entries.
    pub fn entry_count(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SetRepository for InMemoryStorage {
    async fn get_cards_for_set(&self, set_id: &str) -> CardeenoResult<Vec<Card>> {
        let sets = self
            .sets
            .read()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        match sets.get(set_id) {
            Some(set) => Ok(set.ordered_cards()),
            None => Err(CardeenoError::unknown_set(set_id)),
        }
    }

    async fn get_card(&self, card_id: &str) -> CardeenoResult<Option<Card>> {
        let sets = self
            .sets
            .read()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        Ok(sets
            .values()
            .flat_map(|set| set.cards.iter())
            .find(|card| card.id == card_id)
            .cloned())
    }

    async fn get_memory_entries(
        &self,
        user_id: &str,
        card_ids: &[String],
    ) -> CardeenoResult<HashMap<String, MemoryEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        let mut found = HashMap::new();
        for card_id in card_ids {
            let key = (user_id.to_string(), card_id.clone());
            if let Some(entry) = entries.get(&key) {
                found.insert(card_id.clone(), entry.clone());
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl ProgressStore for InMemoryStorage {
    async fn save_memory_entry(&self, entry: MemoryEntry) -> CardeenoResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        entries.insert((entry.user_id.clone(), entry.card_id.clone()), entry);
        Ok(())
    }

    async fn save_session_summary(&self, summary: SessionSummary) -> CardeenoResult<()> {
        let mut summaries = self
            .summaries
            .write()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        summaries.push(summary);
        Ok(())
    }
}
