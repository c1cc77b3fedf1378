//! Applies review outcomes to memory entries.
//!
//! The bucket transition itself is a pure function ([`apply_outcome`]) over
//! an entry and a [`ReviewPolicy`]; the tracker wraps it with identity
//! validation, lazy entry creation, hydration from the set repository, and
//! write-through to the persistence collaborator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::ReviewPolicy;
use crate::error::{ensure_id, CardeenoError, CardeenoResult};
use crate::memory::MemoryStore;
use crate::traits::{ProgressStore, SetRepository};
use crate::types::MemoryEntry;

/// Compute the entry state after one review outcome.
///
/// On a correct review the streak increments and the entry promotes one
/// bucket when the streak reaches the policy threshold (the streak resets
/// on promotion). On a miss the streak resets and the entry demotes one
/// bucket, never below short. Either way the next due time is the current
/// time plus the interval of the bucket the entry lands in, and the
/// last-reviewed time becomes `now`.
pub fn apply_outcome(
    policy: &ReviewPolicy,
    entry: &MemoryEntry,
    correct: bool,
    now: DateTime<Utc>,
) -> MemoryEntry {
    let mut next = entry.clone();

    if correct {
        next.streak += 1;
        if let Some(threshold) = policy.promotion_threshold(next.bucket) {
            if next.streak >= threshold {
                if let Some(promoted) = next.bucket.promoted() {
                    next.bucket = promoted;
                    next.streak = 0;
                }
            }
        }
    } else {
        next.streak = 0;
        next.bucket = next.bucket.demoted();
    }

    next.last_reviewed = now;
    next.next_due = now + policy.interval(next.bucket);
    next
}

/// Applies review outcomes to the memory store and persists the results.
///
/// The single mutation entry point for per-(user, card) review state: every
/// outcome, whether from the matching game or another study mode, goes
/// through [`MemoryTracker::record_outcome`].
pub struct MemoryTracker {
    policy: ReviewPolicy,
    store: MemoryStore,
    repository: Arc<dyn SetRepository>,
    progress: Arc<dyn ProgressStore>,
}

impl MemoryTracker {
    /// Create a tracker with the given policy and collaborators.
    pub fn new(
        policy: ReviewPolicy,
        repository: Arc<dyn SetRepository>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            policy,
            store: MemoryStore::new(),
            repository,
            progress,
        }
    }

    /// The tracker's review policy.
    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    /// The underlying memory store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Record one review outcome for a (user, card) pair.
    ///
    /// Creates the entry on first review (short bucket, zero streak), then
    /// applies the outcome and writes the updated entry through to the
    /// persistence collaborator. The in-memory update is committed before
    /// the write is awaited; a persistence failure is returned to the
    /// caller but does not roll the entry back.
    ///
    /// Fails with an invalid-argument error for malformed identities and an
    /// invalid-reference error when the card is not accessible.
    pub async fn record_outcome(
        &self,
        user_id: &str,
        card_id: &str,
        correct: bool,
        now: DateTime<Utc>,
    ) -> CardeenoResult<MemoryEntry> {
        ensure_id(user_id, "user_id")?;
        ensure_id(card_id, "card_id")?;

        if self.repository.get_card(card_id).await?.is_none() {
            return Err(CardeenoError::unknown_card(card_id));
        }

        // First sight of this key in-process: pull any persisted entry so a
        // restarted core continues from the stored bucket and streak.
        if self.store.get(user_id, card_id)?.is_none() {
            let ids = [card_id.to_string()];
            let mut persisted = self.repository.get_memory_entries(user_id, &ids).await?;
            if let Some(existing) = persisted.remove(card_id) {
                self.store.insert_if_absent(existing)?;
            }
        }

        let updated = self.store.update_or_insert_with(
            user_id,
            card_id,
            || MemoryEntry::new(user_id, card_id, now),
            |entry| apply_outcome(&self.policy, entry, correct, now),
        )?;

        debug!(
            user_id,
            card_id,
            correct,
            bucket = %updated.bucket,
            streak = updated.streak,
            "Recorded review outcome"
        );

        if let Err(err) = self.progress.save_memory_entry(updated.clone()).await {
            warn!(user_id, card_id, error = %err, "Failed to persist memory entry");
            return Err(err);
        }

        Ok(updated)
    }
}
