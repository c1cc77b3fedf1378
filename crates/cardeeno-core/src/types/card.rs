//! Vocabulary cards and study sets.

use serde::{Deserialize, Serialize};

/// A single vocabulary card: a term and its definition.
///
/// Cards are immutable inside the learning core; edits happen through the
/// external set repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: String,
    /// Identity of the owning study set.
    pub set_id: String,
    /// The term side (e.g. "Hello").
    pub term: String,
    /// The definition side (e.g. "Hallo").
    pub definition: String,
    /// Display position within the set. Unique per set, not necessarily
    /// contiguous.
    pub order_index: u32,
}

impl Card {
    /// Create a new card.
    pub fn new(
        id: impl Into<String>,
        set_id: impl Into<String>,
        term: impl Into<String>,
        definition: impl Into<String>,
        order_index: u32,
    ) -> Self {
        Self {
            id: id.into(),
            set_id: set_id.into(),
            term: term.into(),
            definition: definition.into(),
            order_index,
        }
    }
}

/// Sort cards into their display order: ascending order index, ties broken
/// by identity for reproducibility.
pub fn sort_cards(cards: &mut [Card]) {
    cards.sort_by(|a, b| {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// A study set: an ordered collection of cards owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySet {
    /// Unique identifier.
    pub id: String,
    /// Identity of the owning user.
    pub user_id: String,
    /// Display title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the set is visible to other users.
    pub is_public: bool,
    /// The cards of this set. All cards carry this set's identity.
    pub cards: Vec<Card>,
}

impl StudySet {
    /// Create a new study set.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            is_public: false,
            cards: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the set as publicly visible.
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Append a card, stamping it with this set's identity.
    pub fn with_card(
        mut self,
        card_id: impl Into<String>,
        term: impl Into<String>,
        definition: impl Into<String>,
        order_index: u32,
    ) -> Self {
        let set_id = self.id.clone();
        self.cards
            .push(Card::new(card_id, set_id, term, definition, order_index));
        self
    }

    /// Get the cards in display order.
    pub fn ordered_cards(&self) -> Vec<Card> {
        let mut cards = self.cards.clone();
        sort_cards(&mut cards);
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_cards_by_index() {
        let set = StudySet::new("set-1", "user-1", "German Basics")
            .with_card("c", "Water", "Wasser", 8)
            .with_card("a", "Hello", "Hallo", 0)
            .with_card("b", "Goodbye", "Auf Wiedersehen", 1);

        let ordered = set.ordered_cards();
        let ids: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ordered_cards_index_tie_breaks_by_id() {
        let set = StudySet::new("set-1", "user-1", "Ties")
            .with_card("z", "one", "eins", 3)
            .with_card("a", "two", "zwei", 3);

        let ordered = set.ordered_cards();
        let ids: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "z"]);
    }

    #[test]
    fn test_with_card_stamps_set_identity() {
        let set = StudySet::new("set-9", "user-1", "Stamping").with_card("c1", "Yes", "Ja", 0);
        assert_eq!(set.cards[0].set_id, "set-9");
    }

    #[test]
    fn test_card_serialization_round_trip() {
        let card = Card::new("c1", "set-1", "Bread", "Brot", 9);
        let json = serde_json::to_string(&card).unwrap();
        let restored: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, card);
    }
}
