//! cardeeno-core - Core learning engine for Cardeeno.
//!
//! This crate provides the spaced-repetition memory tracker, the due-card
//! scheduler, and the card-matching session state machine behind the
//! Cardeeno vocabulary trainer, independent of any web framework, database
//! client, or UI.
//!
//! # Example
//!
//! ```ignore
//! use cardeeno_core::{CoreConfig, InMemoryStorage, SessionManager, StudySet};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(InMemoryStorage::new());
//! storage.insert_set(
//!     StudySet::new("set-1", "user-1", "German Basics")
//!         .with_card("c1", "Hello", "Hallo", 0)
//!         .with_card("c2", "Water", "Wasser", 1),
//! );
//!
//! let manager = SessionManager::new(CoreConfig::default(), storage.clone(), storage);
//!
//! // Deal a session over the cards that are due, then flip tiles.
//! let view = manager.start_session("user-1", "set-1", 8).await?;
//! let view = manager.apply_flip(&view.session_id, &view.tiles[0].id).await?;
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod memory;
pub mod scheduler;
pub mod sessions;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{CoreConfig, ReviewPolicy};
pub use error::{CardeenoError, CardeenoResult, ErrorCode};
pub use game::{
    CardSide, DealtTile, MatchSession, RoundStatus, RoundView, SessionPhase, SessionRecorder,
    SessionState, TileView, MIN_SESSION_CARDS,
};
pub use memory::{apply_outcome, MemoryKey, MemoryStore, MemoryTracker};
pub use scheduler::{compute_set_progress, select_due_cards, Scheduler};
pub use sessions::SessionManager;
pub use storage::InMemoryStorage;
pub use traits::{ProgressStore, SetRepository};
pub use types::{
    sort_cards, Card, MemoryBucket, MemoryEntry, SessionSummary, SetProgress, StudyMode, StudySet,
};
