//! The matching game state machine.
//!
//! One [`MatchSession`] runs one play-through:
//! `Dealing → AwaitingSelection → Evaluating → (round continues | RoundComplete)`
//! with terminal `SessionComplete`. Evaluation happens inside the flip call
//! that revealed the second tile, so callers observe the machine either
//! awaiting a selection or fully complete.
//!
//! Round state mutations commit before any persistence write is awaited;
//! a failed write is reported to the caller but never reopens a round.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::{CardeenoError, CardeenoResult};
use crate::game::recorder::SessionRecorder;
use crate::game::tile::{deal_tiles, DealtTile, RoundStatus};
use crate::types::Card;

/// Minimum number of dealt cards for a playable session.
pub const MIN_SESSION_CARDS: usize = 2;

/// Phase of a matching session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// Tiles are being laid out.
    Dealing,
    /// Waiting for the player to flip a tile.
    AwaitingSelection,
    /// Two tiles are face up and being compared.
    Evaluating,
    /// Every tile is matched; the summary is being recorded.
    RoundComplete,
    /// Terminal: the session is over and rejects further actions.
    SessionComplete,
}

/// Transient state of one active session.
///
/// Owned exclusively by the [`MatchSession`] running it; never persisted
/// mid-flight.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Session identity.
    pub id: String,
    /// Identity of the playing user.
    pub user_id: String,
    /// Identity of the studied set.
    pub set_id: String,
    /// The dealt board, in layout order.
    pub tiles: Vec<DealtTile>,
    /// Current phase.
    pub phase: SessionPhase,
    /// When the session was dealt.
    pub started_at: DateTime<Utc>,
    /// Indices of currently face-up tiles (at most two).
    shown: Vec<usize>,
}

/// Caller-facing view of one tile.
///
/// The face text is only revealed while the tile is face up or matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    /// Tile identity; the flip target.
    pub id: String,
    /// Current round status.
    pub status: RoundStatus,
    /// The tile's text, present only for shown and matched tiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
}

/// Caller-facing snapshot of a session's current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    /// Session identity.
    pub session_id: String,
    /// Current phase.
    pub phase: SessionPhase,
    /// The board, in layout order.
    pub tiles: Vec<TileView>,
    /// Number of cards dealt into the session.
    pub total_cards: u32,
    /// Cards completed so far.
    pub completed_cards: u32,
    /// Correct outcomes so far.
    pub correct_outcomes: u32,
    /// Incorrect outcomes so far.
    pub incorrect_outcomes: u32,
    /// Current score (may be negative).
    pub score: i64,
}

/// One running matching session.
pub struct MatchSession {
    state: SessionState,
    recorder: SessionRecorder,
}

impl MatchSession {
    /// Deal a new session over the scheduler's selection.
    ///
    /// Requires at least [`MIN_SESSION_CARDS`] cards; fewer fails with
    /// `InsufficientCards` and no session is created. The board is two
    /// tiles per card in an order drawn from `rng`.
    pub fn deal(
        session_id: impl Into<String>,
        cards: &[Card],
        recorder: SessionRecorder,
        now: DateTime<Utc>,
        rng: &mut dyn RngCore,
    ) -> CardeenoResult<Self> {
        if cards.len() < MIN_SESSION_CARDS {
            return Err(CardeenoError::InsufficientCards {
                needed: MIN_SESSION_CARDS,
                available: cards.len(),
            });
        }

        let mut state = SessionState {
            id: session_id.into(),
            user_id: recorder.user_id().to_string(),
            set_id: recorder.set_id().to_string(),
            tiles: deal_tiles(cards, rng),
            phase: SessionPhase::Dealing,
            started_at: now,
            shown: Vec::new(),
        };
        // Dealing completes synchronously; the machine is immediately ready
        // for the first selection.
        state.phase = SessionPhase::AwaitingSelection;

        Ok(Self { state, recorder })
    }

    /// Session identity.
    pub fn id(&self) -> &str {
        &self.state.id
    }

    /// The session's transient state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether the session has reached its terminal phase.
    pub fn is_complete(&self) -> bool {
        self.state.phase == SessionPhase::SessionComplete
    }

    /// Flip one tile.
    ///
    /// Rejected flips (`InvalidMove`, unknown tile, closed session) leave
    /// the session state untouched. When the flip reveals the second tile
    /// of a round, the pair is evaluated here: outcomes are recorded
    /// immediately, and a completed board finalizes the session.
    pub async fn flip(&mut self, tile_id: &str, now: DateTime<Utc>) -> CardeenoResult<RoundView> {
        if self.state.phase == SessionPhase::SessionComplete {
            return Err(CardeenoError::SessionClosed {
                session_id: self.state.id.clone(),
            });
        }

        let index = self
            .state
            .tiles
            .iter()
            .position(|tile| tile.id == tile_id)
            .ok_or_else(|| CardeenoError::unknown_tile(tile_id))?;

        match self.state.tiles[index].status {
            RoundStatus::Matched => return Err(CardeenoError::tile_matched(tile_id)),
            RoundStatus::Shown => return Err(CardeenoError::tile_already_shown(tile_id)),
            RoundStatus::Unseen | RoundStatus::MismatchedPendingRetry => {}
        }

        self.state.tiles[index].status = RoundStatus::Shown;
        self.state.shown.push(index);

        // Persistence failures must not undo committed round state, so they
        // are collected and reported after all transitions are applied.
        let mut deferred_error: Option<CardeenoError> = None;

        if self.state.shown.len() == 2 {
            self.state.phase = SessionPhase::Evaluating;
            let first = self.state.shown[0];
            let second = self.state.shown[1];
            self.state.shown.clear();

            if self.state.tiles[first].card_id == self.state.tiles[second].card_id {
                self.state.tiles[first].status = RoundStatus::Matched;
                self.state.tiles[second].status = RoundStatus::Matched;

                let card_id = self.state.tiles[first].card_id.clone();
                debug!(session_id = %self.state.id, card_id = %card_id, "Pair matched");
                if let Err(err) = self.recorder.record_outcome(&card_id, true, now).await {
                    deferred_error.get_or_insert(err);
                }
            } else {
                self.state.tiles[first].status = RoundStatus::MismatchedPendingRetry;
                self.state.tiles[second].status = RoundStatus::MismatchedPendingRetry;

                // Both cards of a failed pairing take a miss, every time the
                // pairing fails.
                for tile_index in [first, second] {
                    let card_id = self.state.tiles[tile_index].card_id.clone();
                    if let Err(err) = self.recorder.record_outcome(&card_id, false, now).await {
                        deferred_error.get_or_insert(err);
                    }
                }
            }

            let all_matched = self
                .state
                .tiles
                .iter()
                .all(|tile| tile.status == RoundStatus::Matched);
            if all_matched {
                self.state.phase = SessionPhase::RoundComplete;
                if let Err(err) = self.recorder.finalize(now).await {
                    deferred_error.get_or_insert(err);
                }
                self.state.phase = SessionPhase::SessionComplete;
            } else {
                self.state.phase = SessionPhase::AwaitingSelection;
            }
        }

        match deferred_error {
            Some(err) => Err(err),
            None => Ok(self.view()),
        }
    }

    /// Snapshot the current round for the caller.
    pub fn view(&self) -> RoundView {
        RoundView {
            session_id: self.state.id.clone(),
            phase: self.state.phase,
            tiles: self
                .state
                .tiles
                .iter()
                .map(|tile| TileView {
                    id: tile.id.clone(),
                    status: tile.status,
                    face: match tile.status {
                        RoundStatus::Shown | RoundStatus::Matched => Some(tile.face.clone()),
                        RoundStatus::Unseen | RoundStatus::MismatchedPendingRetry => None,
                    },
                })
                .collect(),
            total_cards: self.recorder.total_cards(),
            completed_cards: self.recorder.completed_cards(),
            correct_outcomes: self.recorder.correct_outcomes(),
            incorrect_outcomes: self.recorder.incorrect_outcomes(),
            score: self.recorder.score(),
        }
    }
}
