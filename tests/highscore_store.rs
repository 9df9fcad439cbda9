//! High-score ledger tests against the JSON file store.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::time::Duration;

use slots::scores::{leaderboard, reconcile};
use slots::{
    GameConfig, HighScoreStore, Input, JsonFileStore, Key, ModeKind, ReconcileOutcome,
    ScriptedRandom, Session, SortOrder, StoreError, Visit,
};

fn pot(net_pot: i64) -> Visit {
    Visit {
        net_pot,
        moves_used: 0,
    }
}
use tempfile::tempdir;

#[test]
fn test_reconcile_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("highscores.json");

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        for (i, name) in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"].iter().enumerate() {
            let score = 100 + 5 * i64::try_from(i).unwrap();
            store.insert_record(name, score).unwrap();
        }
        let outcome = reconcile(&mut store, "zed", pot(150), 10).unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Replaced { .. }));
    }

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.len(), 10);
    let board = leaderboard(&store, 10).unwrap();
    assert_eq!(board[0].name, "zed");
    assert_eq!(board[0].score, 150);
    assert!(board.iter().all(|r| r.name != "a"));

    let lowest = store.top_n(1, SortOrder::Ascending).unwrap();
    assert_eq!(lowest[0].score, 105);
}

#[test]
fn test_low_pot_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("highscores.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    for i in 0..10 {
        store.insert_record(&format!("p{i}"), 100 + 5 * i).unwrap();
    }
    let before = fs::read_to_string(&path).unwrap();

    let outcome = reconcile(&mut store, "zed", pot(50), 10).unwrap();
    assert_eq!(outcome, ReconcileOutcome::NotQualified);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_session_writes_through_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores").join("highscores.json");
    let mut store = JsonFileStore::open(&path).unwrap();
    let mut rng = ScriptedRandom::new([5]);
    let mut session = Session::new(GameConfig::default());

    let mut now = Duration::ZERO;
    let mut send = |session: &mut Session, input: Input| {
        now += Duration::from_millis(100);
        session.update(now, &input, &mut rng, &mut store).unwrap();
    };

    send(&mut session, Input::confirm());
    while session.mode().kind() == ModeKind::Spinning {
        send(&mut session, Input::idle());
    }
    send(&mut session, Input::cancel());
    for c in "Max".chars() {
        send(&mut session, Input::typed(c));
    }
    send(&mut session, Input::press(Key::Enter));
    assert_eq!(session.mode().kind(), ModeKind::HighScores);

    let reopened = JsonFileStore::open(&path).unwrap();
    let board = leaderboard(&reopened, 10).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].name, "Max");
    assert_eq!(board[0].score, 245);
}

#[test]
fn test_corrupt_ledger_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("highscores.json");
    fs::write(&path, "{ definitely not a ledger").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert!(err.to_string().contains("corrupt"));
}

#[test]
fn test_play_counters_persist_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("highscores.json");

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        let first = Visit {
            net_pot: 30,
            moves_used: 2,
        };
        reconcile(&mut store, "kim", first, 10).unwrap();
    }
    {
        let mut store = JsonFileStore::open(&path).unwrap();
        let second = Visit {
            net_pot: -10,
            moves_used: 5,
        };
        let outcome = reconcile(&mut store, "kim", second, 10).unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Updated { score: 20, .. }));
    }

    let store = JsonFileStore::open(&path).unwrap();
    let board = leaderboard(&store, 10).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].score, 20);
    assert_eq!(board[0].plays, 2);
    assert_eq!(board[0].moves_used, 7);
}
