//! Session recorder: accumulates outcomes and produces the final summary.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{CardeenoError, CardeenoResult};
use crate::memory::MemoryTracker;
use crate::traits::ProgressStore;
use crate::types::{MemoryEntry, SessionSummary, StudyMode};

/// Accumulates a session's outcomes and emits its summary.
///
/// Every outcome is forwarded to the memory tracker immediately as it
/// arrives, so an abandoned session leaves exactly the memory updates that
/// were earned before abandonment, and nothing else. `finalize` runs at
/// most once; a second call fails without touching persistence again.
pub struct SessionRecorder {
    session_id: String,
    user_id: String,
    set_id: String,
    mode: StudyMode,
    total_cards: u32,
    completed_cards: u32,
    correct_outcomes: u32,
    incorrect_outcomes: u32,
    finalized: bool,
    tracker: Arc<MemoryTracker>,
    progress: Arc<dyn ProgressStore>,
}

impl SessionRecorder {
    /// Create a recorder for one session over `total_cards` dealt cards.
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        set_id: impl Into<String>,
        mode: StudyMode,
        total_cards: u32,
        tracker: Arc<MemoryTracker>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            set_id: set_id.into(),
            mode,
            total_cards,
            completed_cards: 0,
            correct_outcomes: 0,
            incorrect_outcomes: 0,
            finalized: false,
            tracker,
            progress,
        }
    }

    /// Identity of the session's user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Identity of the studied set.
    pub fn set_id(&self) -> &str {
        &self.set_id
    }

    /// Number of cards dealt into the session.
    pub fn total_cards(&self) -> u32 {
        self.total_cards
    }

    /// Number of cards completed so far.
    pub fn completed_cards(&self) -> u32 {
        self.completed_cards
    }

    /// Correct outcomes recorded so far.
    pub fn correct_outcomes(&self) -> u32 {
        self.correct_outcomes
    }

    /// Incorrect outcomes recorded so far.
    pub fn incorrect_outcomes(&self) -> u32 {
        self.incorrect_outcomes
    }

    /// Current score: correct outcomes minus incorrect outcomes.
    pub fn score(&self) -> i64 {
        self.correct_outcomes as i64 - self.incorrect_outcomes as i64
    }

    /// Whether `finalize` has already run.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Record one card outcome and forward it to the memory tracker.
    ///
    /// Counters update before the tracker write is awaited, so a slow or
    /// failing persistence collaborator cannot skew the session totals.
    pub async fn record_outcome(
        &mut self,
        card_id: &str,
        correct: bool,
        now: DateTime<Utc>,
    ) -> CardeenoResult<MemoryEntry> {
        if correct {
            self.correct_outcomes += 1;
            self.completed_cards += 1;
        } else {
            self.incorrect_outcomes += 1;
        }
        self.tracker
            .record_outcome(&self.user_id, card_id, correct, now)
            .await
    }

    /// Finalize the session: compute the score, persist the summary.
    ///
    /// Fails with `SessionAlreadyFinalized` on a second call, performing no
    /// further writes.
    pub async fn finalize(&mut self, now: DateTime<Utc>) -> CardeenoResult<SessionSummary> {
        if self.finalized {
            return Err(CardeenoError::SessionAlreadyFinalized {
                session_id: self.session_id.clone(),
            });
        }
        self.finalized = true;

        let summary = SessionSummary {
            user_id: self.user_id.clone(),
            set_id: self.set_id.clone(),
            mode: self.mode,
            total_cards: self.total_cards,
            completed_cards: self.completed_cards,
            score: self.score(),
            completed_at: now,
        };

        info!(
            session_id = %self.session_id,
            user_id = %self.user_id,
            set_id = %self.set_id,
            score = summary.score,
            completed = summary.completed_cards,
            "Study session finalized"
        );

        self.progress.save_session_summary(summary.clone()).await?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReviewPolicy;
    use crate::storage::InMemoryStorage;
    use crate::traits::MockProgressStore;
    use crate::types::StudySet;

    fn seeded_storage() -> Arc<InMemoryStorage> {
        let storage = InMemoryStorage::new();
        storage.insert_set(
            StudySet::new("set-1", "user-1", "German Basics")
                .with_card("card-1", "Hello", "Hallo", 0)
                .with_card("card-2", "Bread", "Brot", 1),
        );
        Arc::new(storage)
    }

    fn recorder_with(
        storage: Arc<InMemoryStorage>,
        progress: Arc<dyn ProgressStore>,
    ) -> SessionRecorder {
        let tracker = Arc::new(MemoryTracker::new(
            ReviewPolicy::default(),
            storage,
            progress.clone(),
        ));
        SessionRecorder::new(
            "session-1",
            "user-1",
            "set-1",
            StudyMode::Matching,
            2,
            tracker,
            progress,
        )
    }

    #[tokio::test]
    async fn test_outcomes_accumulate_and_forward() {
        let storage = seeded_storage();
        let mut recorder = recorder_with(storage.clone(), storage.clone());
        let now = Utc::now();

        recorder.record_outcome("card-1", true, now).await.unwrap();
        recorder.record_outcome("card-2", false, now).await.unwrap();

        assert_eq!(recorder.correct_outcomes(), 1);
        assert_eq!(recorder.incorrect_outcomes(), 1);
        assert_eq!(recorder.completed_cards(), 1);
        assert_eq!(recorder.score(), 0);

        // Each outcome reached the tracker's store immediately.
        assert_eq!(storage.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_finalize_persists_summary_once() {
        let storage = seeded_storage();
        let mut progress = MockProgressStore::new();
        progress.expect_save_memory_entry().returning(|_| Ok(()));
        progress
            .expect_save_session_summary()
            .times(1)
            .returning(|_| Ok(()));

        let mut recorder = recorder_with(storage, Arc::new(progress));
        let now = Utc::now();

        recorder.record_outcome("card-1", true, now).await.unwrap();
        recorder.record_outcome("card-2", true, now).await.unwrap();

        let summary = recorder.finalize(now).await.unwrap();
        assert_eq!(summary.total_cards, 2);
        assert_eq!(summary.completed_cards, 2);
        assert_eq!(summary.score, 2);
        assert_eq!(summary.mode, StudyMode::Matching);

        // A second finalize fails and, per the mock's `times(1)`, performs
        // no further writes.
        let err = recorder.finalize(now).await.unwrap_err();
        assert!(matches!(err, CardeenoError::SessionAlreadyFinalized { .. }));
    }

    #[tokio::test]
    async fn test_score_can_go_negative() {
        let storage = seeded_storage();
        let mut recorder = recorder_with(storage.clone(), storage);
        let now = Utc::now();

        recorder.record_outcome("card-1", false, now).await.unwrap();
        recorder.record_outcome("card-2", false, now).await.unwrap();
        recorder.record_outcome("card-1", false, now).await.unwrap();
        recorder.record_outcome("card-1", true, now).await.unwrap();

        assert_eq!(recorder.score(), -2);

        let summary = recorder.finalize(now).await.unwrap();
        assert_eq!(summary.score, -2);
    }
}
