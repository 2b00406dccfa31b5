//! Save slot and session hand-off tests against a real directory.

use rust_pairs::board::BoardLayout;
use rust_pairs::core::{CellIndex, DifficultyDatabase, DifficultyId, PersistenceError};
use rust_pairs::session::{
    persist, try_load, JsonFileStore, NewGame, SaveStore, SessionContext, SessionState,
    SAVE_FILE_NAME,
};

fn store() -> (tempfile::TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::in_dir(dir.path());
    (dir, store)
}

fn hard_game(seed: u64) -> NewGame {
    let db = DifficultyDatabase::default();
    NewGame::from_entry(db.get(DifficultyId::Hard).unwrap(), seed).unwrap()
}

#[test]
fn test_file_store_missing_file_is_no_save() {
    let (_dir, store) = store();

    assert!(!store.has_save());
    assert!(store.load().unwrap().is_none());
    assert!(try_load(&store).is_none());
    store.delete().unwrap();
}

#[test]
fn test_file_store_round_trip() {
    let (dir, store) = store();
    let game = hard_game(1234);
    let state = SessionState::new(game.difficulty, game.layout, game.seed);

    persist(&store, &state);

    assert_eq!(store.path(), dir.path().join(SAVE_FILE_NAME));
    assert!(store.has_save());
    assert_eq!(try_load(&store), Some(state));

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("\"emptyIndices\""));
    assert!(text.contains("\"previewDone\": false"));
}

#[test]
fn test_file_store_delete() {
    let (_dir, store) = store();
    let game = hard_game(3);
    persist(&store, &SessionState::new(game.difficulty, game.layout, game.seed));

    store.delete().unwrap();

    assert!(!store.has_save());
    assert!(!store.path().exists());
}

#[test]
fn test_corrupt_file_is_skipped() {
    let (_dir, store) = store();
    std::fs::write(store.path(), "{ not json").unwrap();

    assert!(store.has_save());
    assert!(matches!(store.load(), Err(PersistenceError::Corrupt(_))));
    assert!(try_load(&store).is_none());
}

#[test]
fn test_blank_file_is_no_save() {
    let (_dir, store) = store();
    std::fs::write(store.path(), "  \n").unwrap();

    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_future_version_is_rejected() {
    let (_dir, store) = store();
    let game = hard_game(3);
    let mut record = SessionState::new(game.difficulty, game.layout, game.seed).to_record();
    record.version = 2;
    std::fs::write(store.path(), serde_json::to_string(&record).unwrap()).unwrap();

    assert!(matches!(
        store.load(),
        Err(PersistenceError::UnsupportedVersion { found: 2, expected: 1 })
    ));
}

#[test]
fn test_hand_written_save_resumes() {
    let (_dir, store) = store();
    std::fs::write(
        store.path(),
        r#"{
            "version": 1,
            "difficulty": "medium",
            "rows": 2,
            "cols": 3,
            "emptyIndices": [],
            "seed": 6,
            "attempts": 3,
            "matches": 1,
            "previewDone": true,
            "matchedCellIndices": [3, 0],
            "completed": false
        }"#,
    )
    .unwrap();

    let state = try_load(&store).unwrap();
    assert_eq!(state.difficulty(), DifficultyId::Medium);
    assert_eq!(state.attempts(), 3);
    assert!(state.is_matched(CellIndex::new(0)));
    assert!(state.is_matched(CellIndex::new(3)));
    assert_eq!(state.matched_cells().len(), 2);
}

#[test]
fn test_inconsistent_counters_are_skipped() {
    let (_dir, store) = store();
    let layout = BoardLayout::new(2, 2, []).unwrap();
    let mut record = SessionState::new(DifficultyId::Easy, layout, 1).to_record();
    record.matches = 2;
    record.attempts = 1;
    store.save(&record).unwrap();

    assert!(matches!(
        SessionState::from_record(store.load().unwrap().unwrap()),
        Err(PersistenceError::InconsistentCounters { attempts: 1, matches: 2 })
    ));
    assert!(try_load(&store).is_none());
}

/// A save whose matched cells leave a partner behind would strand that card
/// forever; it is skipped like any corrupt save.
#[test]
fn test_half_matched_pair_falls_back_to_new_game() {
    let (_dir, store) = store();
    let layout = BoardLayout::new(3, 3, [CellIndex::new(4)]).unwrap();
    let mut record = SessionState::new(DifficultyId::Easy, layout, 1).to_record();
    record.matched_cell_indices = vec![0, 4];
    record.attempts = 1;
    record.matches = 1;
    store.save(&record).unwrap();

    assert!(try_load(&store).is_none());

    let session = SessionContext::continue_or(hard_game(20)).into_session(&store);
    assert_eq!(session.seed(), 20);
    assert!(session.matched_cells().is_empty());
}

#[test]
fn test_new_game_keeps_existing_save_until_started() {
    let (_dir, store) = store();
    let old = hard_game(1);
    let mut record = SessionState::new(old.difficulty, old.layout, old.seed).to_record();
    record.attempts = 9;
    store.save(&record).unwrap();

    let session = SessionContext::new_game(hard_game(2)).into_session(&store);

    assert_eq!(session.seed(), 2);
    assert_eq!(session.attempts(), 0);
    assert_eq!(store.load().unwrap(), Some(record));

    persist(&store, &session);
    assert_eq!(store.load().unwrap().unwrap().seed, 2);
}

#[test]
fn test_continue_resumes_then_falls_back() {
    let (_dir, store) = store();
    let first = SessionContext::new_game(hard_game(10)).into_session(&store);
    persist(&store, &first);

    let resumed = SessionContext::continue_or(hard_game(20)).into_session(&store);
    assert_eq!(resumed, first);

    std::fs::write(store.path(), "garbage").unwrap();
    let fallback = SessionContext::continue_or(hard_game(20)).into_session(&store);
    assert_eq!(fallback.seed(), 20);
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "garbage");
}
