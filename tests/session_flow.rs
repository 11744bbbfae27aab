use std::time::Duration;

use pairflip::{
    Deck, FlipOutcome, GameError, GameSession, KeyValueStore, Level, MemoryStore, Phase,
    SessionConfig, Signal, Visibility,
};

fn config() -> SessionConfig {
    SessionConfig {
        resolve_delay: Duration::from_millis(10),
        seed: Some(2024),
    }
}

fn new_session(store: MemoryStore) -> GameSession<MemoryStore> {
    GameSession::new(store, config()).unwrap()
}

/// Index pairs sharing a symbol, in order of first occurrence.
fn pairs(deck: &Deck) -> Vec<(usize, usize)> {
    let tiles = deck.tiles();
    (0..tiles.len())
        .filter_map(|i| {
            let j = (i + 1..tiles.len()).find(|&j| tiles[j].content == tiles[i].content)?;
            Some((i, j))
        })
        .collect()
}

fn mismatch(deck: &Deck) -> (usize, usize) {
    let tiles = deck.tiles();
    let j = (1..tiles.len())
        .find(|&j| tiles[j].content != tiles[0].content)
        .unwrap();
    (0, j)
}

fn attempt(session: &mut GameSession<MemoryStore>, a: usize, b: usize) {
    session.flip(a).unwrap();
    let outcome = session.flip(b).unwrap();
    let FlipOutcome::AwaitingResolution(ticket) = outcome else {
        panic!("expected a pending pair, got {:?}", outcome);
    };
    assert!(session.resolve(ticket).is_some());
}

fn solve(session: &mut GameSession<MemoryStore>) {
    for (a, b) in pairs(session.deck().unwrap()) {
        attempt(session, a, b);
    }
}

fn all_unlocked_at(level: u8) -> MemoryStore {
    let levels: Vec<Level> = (0..6u8)
        .map(|number| Level {
            number,
            unlocked: true,
            tile_count: 0,
            hint_allowance: 0,
        })
        .collect();
    let mut store = MemoryStore::new();
    store.set("levels", &serde_json::to_string(&levels).unwrap()).unwrap();
    store.set("current-level", &level.to_string()).unwrap();
    store
}

#[test]
fn completing_a_level_unlocks_only_the_next_one() {
    let mut session = new_session(MemoryStore::new());
    session.start();
    session.select_level(1).unwrap();
    session.drain_signals().count();

    solve(&mut session);

    let signals: Vec<Signal> = session.drain_signals().collect();
    assert!(signals.contains(&Signal::LevelCompleted {
        level: 1,
        attempts: 4,
        next_unlocked: Some(2),
    }));
    assert!(session.catalog().is_unlocked(2));
    assert!(!session.catalog().is_unlocked(3));
    assert!(!session.catalog().is_unlocked(4));
    assert_eq!(session.level(), 2);
    assert_eq!(session.attempts(), 0);
    assert_eq!(session.hints_remaining(), 3);
    assert_eq!(session.deck().map(Deck::len), Some(12));
    assert_eq!(session.best_try(1), Some(4));

    let store = session.progress().store();
    assert_eq!(store.get("best-try-1").unwrap().as_deref(), Some("4"));
    assert_eq!(store.get("current-level").unwrap().as_deref(), Some("2"));
    let saved: Vec<Level> =
        serde_json::from_str(&store.get("levels").unwrap().unwrap()).unwrap();
    assert!(saved[2].unlocked);
    assert!(!saved[3].unlocked);
}

#[test]
fn attempts_count_pairs_not_single_flips() {
    let mut session = new_session(MemoryStore::new());
    let (a, b) = mismatch(session.deck().unwrap());

    session.flip(a).unwrap();
    assert_eq!(session.attempts(), 0);
    session.flip(b).unwrap();
    assert_eq!(session.attempts(), 1);

    session.resolve_pending();
    let deck = session.deck().unwrap();
    assert_eq!(deck.visibility(a), Some(Visibility::Hidden));
    assert_eq!(deck.visibility(b), Some(Visibility::Hidden));
}

#[test]
fn third_flip_is_ignored_while_a_pair_is_pending() {
    let mut session = new_session(MemoryStore::new());
    session.select_level(1).unwrap();
    let (a, b) = mismatch(session.deck().unwrap());
    let third = (1..8).find(|&i| i != b).unwrap();

    session.flip(a).unwrap();
    session.flip(b).unwrap();

    assert_eq!(session.flip(third).unwrap(), FlipOutcome::Ignored);
    assert_eq!(session.deck().unwrap().revealed_count(), 2);
    assert_eq!(session.attempts(), 1);
}

#[test]
fn best_try_never_gets_worse() {
    let mut session = new_session(MemoryStore::new());
    solve(&mut session);
    assert_eq!(session.best_try(0), Some(2));

    session.select_level(0).unwrap();
    let (a, b) = mismatch(session.deck().unwrap());
    attempt(&mut session, a, b);
    solve(&mut session);

    assert_eq!(session.best_try(0), Some(2));
    assert_eq!(session.progress().best_try(0), Some(2));
}

#[test]
fn locked_level_selection_leaves_round_untouched() {
    let mut session = new_session(MemoryStore::new());
    session.flip(0).unwrap();
    let deck_before = session.deck().cloned();

    assert_eq!(session.select_level(3), Err(GameError::LockedLevel(3)));

    assert_eq!(session.deck().cloned(), deck_before);
    assert_eq!(session.level(), 0);
    assert_eq!(session.attempts(), 0);
    let signals: Vec<Signal> = session.drain_signals().collect();
    assert!(signals.contains(&Signal::LevelRejected(GameError::LockedLevel(3))));
}

#[test]
fn switching_levels_cancels_pending_resolution() {
    let mut session = new_session(MemoryStore::new());
    let (a, b) = pairs(session.deck().unwrap())[0];
    session.flip(a).unwrap();
    let FlipOutcome::AwaitingResolution(ticket) = session.flip(b).unwrap() else {
        panic!("expected a pending pair");
    };

    session.select_level(1).unwrap();

    assert_eq!(session.resolve(ticket), None);
    assert_eq!(session.pending_ticket(), None);
    assert_eq!(session.deck().map(Deck::len), Some(8));
    assert_eq!(session.best_try(0), None);
    let signals: Vec<Signal> = session.drain_signals().collect();
    assert!(signals.contains(&Signal::PairMismatched {
        first: a,
        second: b,
    }));
}

#[test]
fn hints_respect_pending_window_and_allowance() {
    let mut session = new_session(MemoryStore::new());
    session.select_level(1).unwrap();
    assert_eq!(session.hints_remaining(), 2);

    let (i, j) = session.use_hint().unwrap();
    let deck = session.deck().unwrap();
    assert_eq!(deck.visibility(i), Some(Visibility::Hinted));
    assert_eq!(deck.tile(i).map(|t| t.content), deck.tile(j).map(|t| t.content));
    assert_eq!(session.attempts(), 0);

    assert_eq!(session.use_hint(), Err(GameError::HintAlreadyPendingThisRound));
    assert_eq!(session.hints_remaining(), 1);

    attempt(&mut session, i, j);
    assert!(!session.hint_pending());
    let (k, l) = session.use_hint().unwrap();
    attempt(&mut session, k, l);

    assert_eq!(session.use_hint(), Err(GameError::NoHintsRemaining));
    let signals: Vec<Signal> = session.drain_signals().collect();
    assert!(signals.contains(&Signal::HintRejected(GameError::NoHintsRemaining)));
}

#[test]
fn mismatched_hint_tile_hides_and_keeps_the_hint_locked() {
    let mut session = new_session(MemoryStore::new());
    session.select_level(1).unwrap();
    let (i, j) = session.use_hint().unwrap();
    let deck = session.deck().unwrap();
    let k = (0..deck.len())
        .find(|&k| deck.tiles()[k].content != deck.tiles()[i].content)
        .unwrap();

    attempt(&mut session, i, k);

    let deck = session.deck().unwrap();
    assert_eq!(deck.visibility(i), Some(Visibility::Hidden));
    assert_eq!(deck.visibility(j), Some(Visibility::Hinted));
    assert_eq!(deck.visibility(k), Some(Visibility::Hidden));
    assert!(session.hint_pending());
    assert_eq!(session.use_hint(), Err(GameError::HintAlreadyPendingThisRound));

    attempt(&mut session, i, j);
    assert!(!session.hint_pending());
    assert_eq!(session.hints_remaining(), 1);
}

#[test]
fn finishing_the_last_level_wins_and_returns_to_start() {
    let mut session = new_session(all_unlocked_at(5));
    session.start();
    assert_eq!(session.level(), 5);

    solve(&mut session);

    let signals: Vec<Signal> = session.drain_signals().collect();
    assert!(signals.contains(&Signal::GameWon));
    assert!(!signals.iter().any(|s| matches!(s, Signal::LevelCompleted { .. })));
    assert_eq!(session.phase(), Phase::Start);
    assert_eq!(session.level(), 5);
    assert_eq!(session.attempts(), 0);
    let deck = session.deck().unwrap();
    assert!(deck.tiles().iter().all(|t| t.visibility == Visibility::Hidden));
}

#[test]
fn progress_survives_a_new_session() {
    let mut session = new_session(MemoryStore::new());
    solve(&mut session);
    solve(&mut session);
    let store = session.progress().store().clone();

    let reopened = new_session(store);

    assert_eq!(reopened.level(), 2);
    assert!(reopened.catalog().is_unlocked(2));
    assert_eq!(reopened.best_try(0), Some(2));
    assert_eq!(reopened.best_try(1), Some(4));
}

#[test]
fn reset_progress_wipes_everything() {
    let mut session = new_session(MemoryStore::new());
    solve(&mut session);
    solve(&mut session);

    session.reset_progress().unwrap();

    assert_eq!(session.level(), 0);
    assert!(!session.catalog().is_unlocked(2));
    assert_eq!(session.best_try(0), None);
    assert!(session.progress().store().is_empty());
    let signals: Vec<Signal> = session.drain_signals().collect();
    assert_eq!(signals.last(), Some(&Signal::ProgressReset));
}
