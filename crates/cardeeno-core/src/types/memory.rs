//! Per-user, per-card memory tracking state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Assumed retention strength for a (user, card) pair.
///
/// A card climbs from short-term through medium-term to long-term memory as
/// the user keeps answering it correctly, and drops back one level on a miss.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemoryBucket {
    /// Recently introduced; reviewed within minutes.
    Short,
    /// Partially retained; reviewed daily.
    Medium,
    /// Well retained; reviewed weekly.
    Long,
}

impl MemoryBucket {
    /// The next bucket up, or None at the top.
    pub fn promoted(self) -> Option<MemoryBucket> {
        match self {
            MemoryBucket::Short => Some(MemoryBucket::Medium),
            MemoryBucket::Medium => Some(MemoryBucket::Long),
            MemoryBucket::Long => None,
        }
    }

    /// The next bucket down. The short bucket demotes to itself.
    pub fn demoted(self) -> MemoryBucket {
        match self {
            MemoryBucket::Short => MemoryBucket::Short,
            MemoryBucket::Medium => MemoryBucket::Short,
            MemoryBucket::Long => MemoryBucket::Medium,
        }
    }
}

impl Default for MemoryBucket {
    fn default() -> Self {
        MemoryBucket::Short
    }
}

/// Review state for one (user, card) pair.
///
/// Created lazily on the first recorded review; an absent entry means
/// "never reviewed" and is treated as immediately due. Mutated only by the
/// memory tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Identity of the reviewing user.
    pub user_id: String,
    /// Identity of the reviewed card.
    pub card_id: String,
    /// Current retention bucket.
    pub bucket: MemoryBucket,
    /// Consecutive correct reviews since the last promotion or miss.
    pub streak: u32,
    /// When the card was last reviewed.
    pub last_reviewed: DateTime<Utc>,
    /// When the card is next due for review.
    pub next_due: DateTime<Utc>,
}

impl MemoryEntry {
    /// Create a fresh entry for a first review: short bucket, zero streak,
    /// due immediately.
    pub fn new(user_id: impl Into<String>, card_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            card_id: card_id.into(),
            bucket: MemoryBucket::Short,
            streak: 0,
            last_reviewed: now,
            next_due: now,
        }
    }

    /// Whether the card is due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due <= now
    }
}

/// Aggregated learning progress for one user over one set.
///
/// Backs the per-set progress bars in the product UI; computed from already
/// fetched cards and memory entries, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProgress {
    /// Identity of the set.
    pub set_id: String,
    /// Identity of the user.
    pub user_id: String,
    /// Number of cards in the set.
    pub total_cards: usize,
    /// Cards without any recorded review.
    pub never_reviewed: usize,
    /// Cards due for review right now (including never-reviewed ones).
    pub due_now: usize,
    /// Cards currently in the short bucket.
    pub short: usize,
    /// Cards currently in the medium bucket.
    pub medium: usize,
    /// Cards currently in the long bucket.
    pub long: usize,
}
