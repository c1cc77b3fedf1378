//! Due-card selection for upcoming study sessions.
//!
//! The decision core ([`select_due_cards`], [`compute_set_progress`]) is
//! pure and side-effect free: it takes already-fetched cards and memory
//! entries, so ordering and tie-break behavior can be tested without a
//! store. [`Scheduler`] wraps it with the repository fetch.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{ensure_id, CardeenoError, CardeenoResult};
use crate::traits::SetRepository;
use crate::types::{Card, MemoryEntry, SetProgress};

/// Select up to `limit` cards for the next session.
///
/// Due cards (entry absent, or next due time reached) come first, ordered by
/// ascending next-due with never-reviewed cards ahead of everything; ties
/// break by card order index, then identity, so identical inputs always
/// yield the identical sequence. If fewer than `limit` cards are due, the
/// remainder backfills from not-yet-due cards in ascending next-due order.
///
/// Returns fewer than `limit` cards only when the set itself has fewer.
/// An empty card list yields an empty selection; `limit == 0` fails with an
/// invalid-argument error.
pub fn select_due_cards(
    cards: &[Card],
    entries: &HashMap<String, MemoryEntry>,
    now: DateTime<Utc>,
    limit: usize,
) -> CardeenoResult<Vec<Card>> {
    if limit == 0 {
        return Err(CardeenoError::invalid_argument("limit must be at least 1"));
    }

    let (mut due, mut not_due): (Vec<&Card>, Vec<&Card>) = cards
        .iter()
        .partition(|card| match entries.get(&card.id) {
            None => true,
            Some(entry) => entry.is_due(now),
        });

    due.sort_by(|a, b| selection_key(a, entries).cmp(&selection_key(b, entries)));
    not_due.sort_by(|a, b| selection_key(a, entries).cmp(&selection_key(b, entries)));

    let mut selected: Vec<Card> = due.into_iter().take(limit).cloned().collect();
    if selected.len() < limit {
        let remaining = limit - selected.len();
        selected.extend(not_due.into_iter().take(remaining).cloned());
    }

    Ok(selected)
}

/// Ordering key: never-reviewed first, then ascending next-due, then card
/// order index, then identity.
fn selection_key<'a>(
    card: &'a Card,
    entries: &HashMap<String, MemoryEntry>,
) -> (u8, DateTime<Utc>, u32, &'a str) {
    match entries.get(&card.id) {
        None => (0, DateTime::<Utc>::MIN_UTC, card.order_index, &card.id),
        Some(entry) => (1, entry.next_due, card.order_index, &card.id),
    }
}

/// Aggregate a user's progress over one set's cards.
pub fn compute_set_progress(
    set_id: &str,
    user_id: &str,
    cards: &[Card],
    entries: &HashMap<String, MemoryEntry>,
    now: DateTime<Utc>,
) -> SetProgress {
    let mut progress = SetProgress {
        set_id: set_id.to_string(),
        user_id: user_id.to_string(),
        total_cards: cards.len(),
        ..Default::default()
    };

    for card in cards {
        match entries.get(&card.id) {
            None => {
                progress.never_reviewed += 1;
                progress.due_now += 1;
            }
            Some(entry) => {
                if entry.is_due(now) {
                    progress.due_now += 1;
                }
                match entry.bucket {
                    crate::types::MemoryBucket::Short => progress.short += 1,
                    crate::types::MemoryBucket::Medium => progress.medium += 1,
                    crate::types::MemoryBucket::Long => progress.long += 1,
                }
            }
        }
    }

    progress
}

/// Selects and orders due cards for a user's next session over a set.
pub struct Scheduler {
    repository: Arc<dyn SetRepository>,
}

impl Scheduler {
    /// Create a scheduler over the given repository.
    pub fn new(repository: Arc<dyn SetRepository>) -> Self {
        Self { repository }
    }

    /// Fetch a set's cards and the user's entries, then select due cards.
    ///
    /// See [`select_due_cards`] for ordering semantics. Fails with an
    /// invalid-reference error for an unknown set and an invalid-argument
    /// error for a zero limit or malformed identities, both before any
    /// fetch.
    pub async fn select_due(
        &self,
        set_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> CardeenoResult<Vec<Card>> {
        ensure_id(set_id, "set_id")?;
        ensure_id(user_id, "user_id")?;
        if limit == 0 {
            return Err(CardeenoError::invalid_argument("limit must be at least 1"));
        }

        let cards = self.repository.get_cards_for_set(set_id).await?;
        if cards.is_empty() {
            return Ok(Vec::new());
        }

        let card_ids: Vec<String> = cards.iter().map(|c| c.id.clone()).collect();
        let entries = self.repository.get_memory_entries(user_id, &card_ids).await?;

        let selected = select_due_cards(&cards, &entries, now, limit)?;
        debug!(
            set_id,
            user_id,
            requested = limit,
            selected = selected.len(),
            "Selected cards for session"
        );
        Ok(selected)
    }

    /// Compute the user's progress over a set.
    pub async fn set_progress(
        &self,
        set_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> CardeenoResult<SetProgress> {
        ensure_id(set_id, "set_id")?;
        ensure_id(user_id, "user_id")?;

        let cards = self.repository.get_cards_for_set(set_id).await?;
        let card_ids: Vec<String> = cards.iter().map(|c| c.id.clone()).collect();
        let entries = self.repository.get_memory_entries(user_id, &card_ids).await?;

        Ok(compute_set_progress(set_id, user_id, &cards, &entries, now))
    }
}
