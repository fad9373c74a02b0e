//! Several connections writing to one database file at the same time.

mod common;

use common::create_random_account;
use simplebank_core::db::{close_db, open_db};
use simplebank_core::{
    AccountRepository, ListAccountsParams, SqliteAccountRepository, UpdateAccountParams,
};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const THREAD_COUNT: usize = 4;
const ACCOUNTS_PER_THREAD: usize = 10;

#[test]
fn concurrent_creators_get_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = Arc::new(dir.path().join("concurrent.db"));

    // Migrate once up front so workers only race on data writes.
    close_db(open_db(path.as_path()).unwrap()).unwrap();

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let path = Arc::clone(&path);
            thread::spawn(move || {
                let conn = open_db(path.as_path()).unwrap();
                let repo = SqliteAccountRepository::try_new(&conn).unwrap();
                barrier.wait();
                (0..ACCOUNTS_PER_THREAD)
                    .map(|_| create_random_account(&repo).id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "id {id} handed out twice");
        }
    }
    assert_eq!(ids.len(), THREAD_COUNT * ACCOUNTS_PER_THREAD);

    let conn = open_db(path.as_path()).unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    let listed = repo
        .list_accounts(&ListAccountsParams::page(1000, 0))
        .unwrap();
    assert_eq!(listed.len(), ids.len());
    assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn readers_never_observe_partial_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = Arc::new(dir.path().join("isolation.db"));

    let account = {
        let conn = open_db(path.as_path()).unwrap();
        let repo = SqliteAccountRepository::try_new(&conn).unwrap();
        create_random_account(&repo)
    };

    let writer = {
        let path = Arc::clone(&path);
        let id = account.id;
        thread::spawn(move || {
            let conn = open_db(path.as_path()).unwrap();
            let repo = SqliteAccountRepository::try_new(&conn).unwrap();
            for balance in 0..50 {
                repo.update_account(&UpdateAccountParams { id, balance })
                    .unwrap();
            }
        })
    };

    let conn = open_db(path.as_path()).unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    for _ in 0..50 {
        let seen = repo.get_account(account.id).unwrap();
        assert_eq!(seen.owner, account.owner);
        assert_eq!(seen.currency, account.currency);
        assert_eq!(seen.created_at, account.created_at);
    }

    writer.join().unwrap();
    assert_eq!(repo.get_account(account.id).unwrap().balance, 49);
}
