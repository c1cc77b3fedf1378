//! The matching game: dealt tiles, the per-session state machine, and the
//! session recorder.

mod engine;
mod recorder;
mod tile;

pub use engine::{MatchSession, RoundView, SessionPhase, SessionState, TileView, MIN_SESSION_CARDS};
pub use recorder::SessionRecorder;
pub use tile::{deal_tiles, CardSide, DealtTile, RoundStatus};
