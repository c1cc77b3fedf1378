//! Tiles: the pieces of a matching round.
//!
//! Each dealt card contributes exactly one term tile and one definition
//! tile, so two distinct face-up tiles with the same parent card are
//! necessarily a term/definition pair.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::Card;

/// Which face of a card a tile shows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardSide {
    Term,
    Definition,
}

/// Round status of one tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoundStatus {
    /// Face down, not yet picked this round.
    Unseen,
    /// Currently face up, awaiting its partner selection.
    Shown,
    /// Paired with its partner; out of play.
    Matched,
    /// Was part of a failed pairing; face down again and selectable.
    MismatchedPendingRetry,
}

/// One tile on the board of an active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtTile {
    /// Tile identity, stable for the lifetime of the session.
    pub id: String,
    /// Identity of the parent card; the pair identity for matching.
    pub card_id: String,
    /// Which face of the card this tile carries.
    pub side: CardSide,
    /// The display text of that face.
    pub face: String,
    /// Current round status.
    pub status: RoundStatus,
}

impl DealtTile {
    fn new(card: &Card, side: CardSide) -> Self {
        let face = match side {
            CardSide::Term => card.term.clone(),
            CardSide::Definition => card.definition.clone(),
        };
        Self {
            id: format!("{}#{}", card.id, side),
            card_id: card.id.clone(),
            side,
            face,
            status: RoundStatus::Unseen,
        }
    }

    /// Whether the tile may be flipped right now.
    pub fn is_selectable(&self) -> bool {
        matches!(
            self.status,
            RoundStatus::Unseen | RoundStatus::MismatchedPendingRetry
        )
    }
}

/// Deal a board: two tiles per card, in shuffled layout order.
pub fn deal_tiles(cards: &[Card], rng: &mut dyn RngCore) -> Vec<DealtTile> {
    let mut tiles = Vec::with_capacity(cards.len() * 2);
    for card in cards {
        tiles.push(DealtTile::new(card, CardSide::Term));
        tiles.push(DealtTile::new(card, CardSide::Definition));
    }
    tiles.shuffle(rng);
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cards() -> Vec<Card> {
        vec![
            Card::new("c1", "set-1", "Hello", "Hallo", 0),
            Card::new("c2", "set-1", "Water", "Wasser", 1),
        ]
    }

    #[test]
    fn test_deal_produces_two_tiles_per_card() {
        let mut rng = StdRng::seed_from_u64(7);
        let tiles = deal_tiles(&cards(), &mut rng);

        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.status == RoundStatus::Unseen));

        let c1_tiles: Vec<&DealtTile> = tiles.iter().filter(|t| t.card_id == "c1").collect();
        assert_eq!(c1_tiles.len(), 2);
        assert_ne!(c1_tiles[0].side, c1_tiles[1].side);
    }

    #[test]
    fn test_tile_faces_follow_sides() {
        let mut rng = StdRng::seed_from_u64(7);
        let tiles = deal_tiles(&cards(), &mut rng);

        let term = tiles
            .iter()
            .find(|t| t.card_id == "c1" && t.side == CardSide::Term)
            .unwrap();
        assert_eq!(term.face, "Hello");
        assert_eq!(term.id, "c1#term");

        let definition = tiles
            .iter()
            .find(|t| t.card_id == "c1" && t.side == CardSide::Definition)
            .unwrap();
        assert_eq!(definition.face, "Hallo");
        assert_eq!(definition.id, "c1#definition");
    }

    #[test]
    fn test_deal_is_reproducible_with_seeded_rng() {
        let first = deal_tiles(&cards(), &mut StdRng::seed_from_u64(42));
        let second = deal_tiles(&cards(), &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_selectable_statuses() {
        let card = Card::new("c1", "set-1", "Yes", "Ja", 0);
        let mut tile = DealtTile::new(&card, CardSide::Term);

        assert!(tile.is_selectable());
        tile.status = RoundStatus::MismatchedPendingRetry;
        assert!(tile.is_selectable());
        tile.status = RoundStatus::Shown;
        assert!(!tile.is_selectable());
        tile.status = RoundStatus::Matched;
        assert!(!tile.is_selectable());
    }
}
