//! Persisted study-session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a study session was played.
///
/// Stored as the `mode` tag on persisted session records. The matching game
/// engine always records [`StudyMode::Matching`]; the flashcard mode exists
/// in the product's data model and is produced by other clients.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StudyMode {
    /// Card-matching gameplay (term tiles paired with definition tiles).
    Matching,
    /// Classic one-card-at-a-time flashcard review.
    Flashcard,
}

/// Summary of one completed study session.
///
/// Created exactly once by the session recorder when a session finishes,
/// then handed to the persistence collaborator. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Identity of the user who played the session.
    pub user_id: String,
    /// Identity of the studied set.
    pub set_id: String,
    /// Gameplay mode.
    pub mode: StudyMode,
    /// Number of vocabulary cards dealt into the session.
    pub total_cards: u32,
    /// Number of cards the user completed (matched).
    pub completed_cards: u32,
    /// Correct outcomes minus incorrect outcomes. May be negative.
    pub score: i64,
    /// When the session completed.
    pub completed_at: DateTime<Utc>,
}
