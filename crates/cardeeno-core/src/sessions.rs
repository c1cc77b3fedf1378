//! The caller-facing surface of the learning core.
//!
//! A [`SessionManager`] ties the scheduler, the matching game engine, the
//! session recorder, and the memory tracker together behind the three
//! operations a UI or HTTP layer needs: start a session, flip a tile,
//! abandon a session.
//!
//! Each session is retrievable by identity and guarded by its own async
//! mutex, so every external call loads, validates, and commits one state
//! transition while independent sessions run in parallel.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{ensure_id, CardeenoError, CardeenoResult};
use crate::game::{MatchSession, RoundView, SessionRecorder};
use crate::memory::MemoryTracker;
use crate::scheduler::Scheduler;
use crate::traits::{ProgressStore, SetRepository};
use crate::types::{SetProgress, StudyMode};

/// Runs matching sessions over a set/card repository and a persistence
/// collaborator.
pub struct SessionManager {
    progress: Arc<dyn ProgressStore>,
    tracker: Arc<MemoryTracker>,
    scheduler: Scheduler,
    sessions: RwLock<HashMap<String, Arc<Mutex<MatchSession>>>>,
}

impl SessionManager {
    /// Create a manager with the given configuration and collaborators.
    pub fn new(
        config: CoreConfig,
        repository: Arc<dyn SetRepository>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        let tracker = Arc::new(MemoryTracker::new(
            config.review,
            repository.clone(),
            progress.clone(),
        ));
        let scheduler = Scheduler::new(repository);

        Self {
            progress,
            tracker,
            scheduler,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The shared memory tracker.
    pub fn tracker(&self) -> &Arc<MemoryTracker> {
        &self.tracker
    }

    /// The due-card scheduler.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of currently registered sessions (active and completed).
    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Start a matching session for a user over a set.
    ///
    /// The scheduler picks up to `limit` due cards; at least two are needed
    /// or the start fails with `InsufficientCards` and nothing is created.
    /// Returns the initial round view, which carries the new session's
    /// identity and the dealt tile ids.
    pub async fn start_session(
        &self,
        user_id: &str,
        set_id: &str,
        limit: usize,
    ) -> CardeenoResult<RoundView> {
        let now = Utc::now();
        let cards = self.scheduler.select_due(set_id, user_id, now, limit).await?;

        let session_id = Uuid::new_v4().to_string();
        let recorder = SessionRecorder::new(
            &session_id,
            user_id,
            set_id,
            StudyMode::Matching,
            cards.len() as u32,
            self.tracker.clone(),
            self.progress.clone(),
        );
        let session = MatchSession::deal(
            &session_id,
            &cards,
            recorder,
            now,
            &mut rand::thread_rng(),
        )?;
        let view = session.view();

        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(session)));

        info!(
            session_id = %session_id,
            user_id,
            set_id,
            cards = cards.len(),
            "Matching session started"
        );
        Ok(view)
    }

    /// Flip a tile in an active session and return the resulting round view.
    pub async fn apply_flip(&self, session_id: &str, tile_id: &str) -> CardeenoResult<RoundView> {
        let session = self.session_handle(session_id)?;
        let mut session = session.lock().await;
        session.flip(tile_id, Utc::now()).await
    }

    /// Read-only snapshot of a session's current round.
    pub async fn round_view(&self, session_id: &str) -> CardeenoResult<RoundView> {
        let session = self.session_handle(session_id)?;
        let session = session.lock().await;
        Ok(session.view())
    }

    /// Abandon a session, dropping its transient state.
    ///
    /// Performs no writes: outcomes already recorded stay recorded, and no
    /// summary is emitted. Also evicts completed sessions.
    pub async fn abandon_session(&self, session_id: &str) -> CardeenoResult<()> {
        ensure_id(session_id, "session_id")?;
        let removed = {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|e| CardeenoError::internal(e.to_string()))?;
            sessions.remove(session_id)
        };
        match removed {
            Some(_) => {
                debug!(session_id, "Session abandoned");
                Ok(())
            }
            None => Err(CardeenoError::unknown_session(session_id)),
        }
    }

    /// The user's learning progress over a set.
    pub async fn set_progress(&self, user_id: &str, set_id: &str) -> CardeenoResult<SetProgress> {
        self.scheduler.set_progress(set_id, user_id, Utc::now()).await
    }

    fn session_handle(&self, session_id: &str) -> CardeenoResult<Arc<Mutex<MatchSession>>> {
        ensure_id(session_id, "session_id")?;
        let sessions = self
            .sessions
            .read()
            .map_err(|e| CardeenoError::internal(e.to_string()))?;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| CardeenoError::unknown_session(session_id))
    }
}
