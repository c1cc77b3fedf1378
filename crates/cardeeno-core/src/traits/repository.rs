//! Read-side collaborator: the set/card repository.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::CardeenoResult;
use crate::types::{Card, MemoryEntry};

/// Read access to study sets, cards, and persisted memory entries.
///
/// Implemented by whatever storage backs the product (the core ships an
/// in-memory implementation for embedding and tests). The core never writes
/// through this trait; writes go through
/// [`ProgressStore`](crate::traits::ProgressStore).
#[async_trait]
pub trait SetRepository: Send + Sync {
    /// Get all cards of a set in display order.
    ///
    /// Fails with an invalid-reference error for an unknown set. A known
    /// set with no cards yields an empty vector.
    async fn get_cards_for_set(&self, set_id: &str) -> CardeenoResult<Vec<Card>>;

    /// Look up a single card by identity.
    ///
    /// Returns None if no such card exists or it is not accessible.
    async fn get_card(&self, card_id: &str) -> CardeenoResult<Option<Card>>;

    /// Get the user's memory entries for the given cards.
    ///
    /// The returned map is keyed by card identity; cards the user has never
    /// reviewed are simply absent.
    async fn get_memory_entries(
        &self,
        user_id: &str,
        card_ids: &[String],
    ) -> CardeenoResult<HashMap<String, MemoryEntry>>;
}
