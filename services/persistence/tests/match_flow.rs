//! Like → match flow against the SQLite store

use match_engine::{MatchEngine, PairState};
use persistence::{SqliteStore, StoreError};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;
use types::errors::LikeError;
use types::ids::UserId;
use types::user::NewUser;

fn profile(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: None,
        age: 25,
        country: "cz".to_string(),
        bio: String::new(),
        verified: true,
        premium: false,
        distance_km: 7,
    }
}

fn add_users(store: &SqliteStore, names: &[&str]) -> Vec<UserId> {
    names
        .iter()
        .map(|name| store.create_user(profile(name)).unwrap().id)
        .collect()
}

#[test]
fn test_like_back_creates_single_match() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let engine = MatchEngine::new(Arc::clone(&store));
    let ids = add_users(&store, &["Tereza", "Klára"]);
    let (a, b) = (ids[0], ids[1]);

    let first = engine.record_like(a, b, false).unwrap();
    assert!(!first.matched);
    assert_eq!(
        engine.pair_state(a, b).unwrap(),
        PairState::OneSidedLike { liker_id: a }
    );

    let second = engine.record_like(b, a, true).unwrap();
    assert!(second.matched);
    let created = second.new_match.unwrap();
    assert_eq!((created.user1_id, created.user2_id), (a, b));

    assert!(engine.check_mutual_like(b, a).unwrap());
    assert_eq!(store.stats().unwrap().active_matches, 1);

    let err = engine.record_like(a, b, false).unwrap_err();
    assert!(err.is_duplicate());
    assert_eq!(store.stats().unwrap().active_matches, 1);
}

#[test]
fn test_rejected_likes_leave_no_rows() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let engine = MatchEngine::new(Arc::clone(&store));
    let ids = add_users(&store, &["Anička"]);

    assert_eq!(
        engine.record_like(ids[0], ids[0], false).unwrap_err(),
        LikeError::SelfLike
    );
    assert_eq!(
        engine.record_like(ids[0], UserId::new(999), false).unwrap_err(),
        LikeError::UnknownUser {
            user_id: UserId::new(999)
        }
    );
    assert_eq!(
        engine
            .pair_state(ids[0], UserId::new(999))
            .unwrap(),
        PairState::NoInteraction
    );
}

#[test]
fn test_deleting_user_cascades_likes_and_matches() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let engine = MatchEngine::new(Arc::clone(&store));
    let ids = add_users(&store, &["Veronika", "Nikola"]);
    let (a, b) = (ids[0], ids[1]);

    engine.record_like(a, b, false).unwrap();
    let match_id = engine.record_like(b, a, false).unwrap().match_id.unwrap();

    assert!(store.delete_user(a).unwrap());

    assert!(store.get_match(match_id).unwrap().is_none());
    assert!(store.list_matches(b).unwrap().is_empty());
    assert!(!engine.check_mutual_like(a, b).unwrap());
    assert_eq!(
        engine.record_like(b, a, false).unwrap_err(),
        LikeError::UnknownUser { user_id: a }
    );
}

#[test]
fn test_parallel_likes_on_shared_store() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let users = add_users(&store, &["u1", "u2", "u3", "u4", "u5", "u6", "u7", "u8"]);
    let engine = Arc::new(MatchEngine::new(Arc::clone(&store)));

    let handles: Vec<_> = users
        .iter()
        .copied()
        .map(|liker| {
            let engine = Arc::clone(&engine);
            let users = users.clone();
            thread::spawn(move || {
                for liked in users.into_iter().filter(|u| *u != liker) {
                    engine.record_like(liker, liked, false).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // 8 users, every pair mutual: 8 * 7 / 2 matches
    assert_eq!(store.stats().unwrap().active_matches, 28);
    for user in &users {
        assert_eq!(store.list_matches(*user).unwrap().len(), 7);
    }
}

#[test]
fn test_two_connections_race_on_one_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("loveconnect.db");
    let setup = SqliteStore::open(&path).unwrap();

    for round in 0..20 {
        let ids = add_users(&setup, &["Tereza", "Klára"]);
        let (a, b) = (ids[0], ids[1]);

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = [(a, b), (b, a)]
            .into_iter()
            .map(|(liker, liked)| {
                let path = path.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    // Each side gets its own connection to the same file.
                    let engine = MatchEngine::new(SqliteStore::open(&path).unwrap());
                    barrier.wait();
                    engine.record_like(liker, liked, false).unwrap()
                })
            })
            .collect();
        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(
            outcomes.iter().filter(|o| o.new_match.is_some()).count(),
            1,
            "round {round}"
        );
        assert_eq!(setup.list_matches(a).unwrap().len(), 1, "round {round}");
    }
    assert_eq!(setup.stats().unwrap().active_matches, 20);
}

#[test]
fn test_update_of_missing_user() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(matches!(
        store.update_user(UserId::new(1), Default::default()),
        Err(StoreError::NotFound { entity: "user", id: 1 })
    ));
}
