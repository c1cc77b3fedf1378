//! Integration tests for the full matching-session flow.
//!
//! Drives the public surface end to end: scheduling, dealing, flipping,
//! outcome recording, and session summaries against the in-memory storage
//! collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use cardeeno_core::{
    CardeenoError, CoreConfig, InMemoryStorage, MemoryBucket, RoundView, SessionManager,
    SessionPhase, StudyMode, StudySet,
};

fn seeded_manager() -> (SessionManager, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    storage.insert_set(
        StudySet::new("german-basics-001", "user-1", "German Basics")
            .with_description("Essential German words and phrases for beginners")
            .with_public(true)
            .with_card("g1", "Hello", "Hallo", 0)
            .with_card("g2", "Goodbye", "Auf Wiedersehen", 1)
            .with_card("g3", "Please", "Bitte", 2)
            .with_card("g4", "Thank you", "Danke", 3),
    );
    (
        SessionManager::new(CoreConfig::default(), storage.clone(), storage.clone()),
        storage,
    )
}

/// Group the dealt tile ids by parent card ("card#side" layout).
fn tile_pairs(view: &RoundView) -> Vec<(String, String)> {
    let mut by_card: HashMap<String, Vec<String>> = HashMap::new();
    for tile in &view.tiles {
        let card = tile.id.split('#').next().unwrap().to_string();
        by_card.entry(card).or_default().push(tile.id.clone());
    }
    let mut pairs: Vec<(String, String)> = by_card
        .into_values()
        .map(|mut tiles| {
            tiles.sort();
            (tiles[0].clone(), tiles[1].clone())
        })
        .collect();
    pairs.sort();
    pairs
}

/// Match every pair of an open session.
async fn complete_session(manager: &SessionManager, view: &RoundView) -> RoundView {
    let mut last = view.clone();
    for (a, b) in tile_pairs(view) {
        manager.apply_flip(&view.session_id, &a).await.unwrap();
        last = manager.apply_flip(&view.session_id, &b).await.unwrap();
    }
    last
}

#[tokio::test]
async fn test_flawless_session_records_summary_and_memory() {
    let (manager, storage) = seeded_manager();

    let view = manager
        .start_session("user-1", "german-basics-001", 4)
        .await
        .unwrap();
    assert_eq!(view.total_cards, 4);
    assert_eq!(view.tiles.len(), 8);

    let final_view = complete_session(&manager, &view).await;
    assert_eq!(final_view.phase, SessionPhase::SessionComplete);
    assert_eq!(final_view.completed_cards, 4);
    assert_eq!(final_view.score, 4);

    // Exactly one summary was persisted, tagged as a matching session.
    let summaries = storage.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].mode, StudyMode::Matching);
    assert_eq!(summaries[0].user_id, "user-1");
    assert_eq!(summaries[0].set_id, "german-basics-001");
    assert_eq!(summaries[0].total_cards, 4);
    assert_eq!(summaries[0].completed_cards, 4);
    assert_eq!(summaries[0].score, 4);

    // Every matched card got a memory entry on its first review.
    assert_eq!(storage.entry_count(), 4);
    let progress = manager
        .set_progress("user-1", "german-basics-001")
        .await
        .unwrap();
    assert_eq!(progress.never_reviewed, 0);
    assert_eq!(progress.short, 4);
}

#[tokio::test]
async fn test_repeated_sessions_promote_cards() {
    let (manager, _storage) = seeded_manager();

    // Two flawless play-throughs: every card reaches the default promotion
    // streak of 2 and climbs into the medium bucket. The second session is
    // served by backfill, since nothing is due ten minutes early.
    for _ in 0..2 {
        let view = manager
            .start_session("user-1", "german-basics-001", 4)
            .await
            .unwrap();
        assert_eq!(view.total_cards, 4);
        complete_session(&manager, &view).await;
    }

    let progress = manager
        .set_progress("user-1", "german-basics-001")
        .await
        .unwrap();
    assert_eq!(progress.medium, 4);
    assert_eq!(progress.short, 0);

    let entries = manager
        .tracker()
        .store()
        .get("user-1", "g1")
        .unwrap()
        .unwrap();
    assert_eq!(entries.bucket, MemoryBucket::Medium);
    assert_eq!(entries.streak, 0);
}

#[tokio::test]
async fn test_mismatches_drive_score_negative() {
    let (manager, storage) = seeded_manager();

    let view = manager
        .start_session("user-1", "german-basics-001", 2)
        .await
        .unwrap();
    let pairs = tile_pairs(&view);
    let (first_a, _first_b) = pairs[0].clone();
    let (second_a, second_b) = pairs[1].clone();

    // Three cross-pair misses: six incorrect outcomes.
    for _ in 0..3 {
        manager.apply_flip(&view.session_id, &first_a).await.unwrap();
        manager.apply_flip(&view.session_id, &second_a).await.unwrap();
    }

    // Then clean up the board.
    let final_view = complete_session(&manager, &view).await;

    assert_eq!(final_view.phase, SessionPhase::SessionComplete);
    assert_eq!(final_view.incorrect_outcomes, 6);
    assert_eq!(final_view.correct_outcomes, 2);
    assert_eq!(final_view.score, -4);

    let summaries = storage.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].score, -4);
    assert_eq!(summaries[0].completed_cards, 2);

    // The misses knocked streaks back to zero before the final match.
    let entry = manager
        .tracker()
        .store()
        .get("user-1", second_b.split('#').next().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(entry.bucket, MemoryBucket::Short);
    assert_eq!(entry.streak, 1);
}

#[tokio::test]
async fn test_abandoned_session_leaves_no_summary() {
    let (manager, storage) = seeded_manager();

    let view = manager
        .start_session("user-1", "german-basics-001", 3)
        .await
        .unwrap();

    // Match one pair, then abandon.
    let (a, b) = tile_pairs(&view).remove(0);
    manager.apply_flip(&view.session_id, &a).await.unwrap();
    manager.apply_flip(&view.session_id, &b).await.unwrap();
    manager.abandon_session(&view.session_id).await.unwrap();

    assert!(storage.summaries().is_empty());
    // The one recorded outcome stays recorded.
    assert_eq!(storage.entry_count(), 1);

    // The abandoned session is gone.
    let err = manager.round_view(&view.session_id).await.unwrap_err();
    assert!(matches!(err, CardeenoError::InvalidReference { .. }));
}

#[tokio::test]
async fn test_error_taxonomy_through_public_surface() {
    let (manager, _storage) = seeded_manager();

    // Unknown set.
    let err = manager
        .start_session("user-1", "missing-set", 4)
        .await
        .unwrap_err();
    assert!(matches!(err, CardeenoError::InvalidReference { .. }));

    // Bad limit.
    let err = manager
        .start_session("user-1", "german-basics-001", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, CardeenoError::InvalidArgument { .. }));

    // Completed sessions reject further flips but stay addressable.
    let view = manager
        .start_session("user-1", "german-basics-001", 2)
        .await
        .unwrap();
    let final_view = complete_session(&manager, &view).await;
    assert_eq!(final_view.phase, SessionPhase::SessionComplete);

    let err = manager
        .apply_flip(&view.session_id, &view.tiles[0].id)
        .await
        .unwrap_err();
    assert!(matches!(err, CardeenoError::SessionClosed { .. }));

    let snapshot = manager.round_view(&view.session_id).await.unwrap();
    assert_eq!(snapshot.phase, SessionPhase::SessionComplete);
}
