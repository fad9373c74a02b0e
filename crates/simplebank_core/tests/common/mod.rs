//! Random fixture data for account tests.

#![allow(dead_code)]

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use simplebank_core::{Account, AccountRepository, CreateAccountParams};

pub const CURRENCIES: &[&str] = &["USD", "EUR", "CAD"];

/// Random lowercase owner name, six characters long.
pub fn random_owner() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .filter(u8::is_ascii_alphabetic)
        .take(6)
        .map(|byte| char::from(byte.to_ascii_lowercase()))
        .collect()
}

/// Random balance between 0 and 1000.
pub fn random_money() -> i64 {
    rand::thread_rng().gen_range(0..=1000)
}

pub fn random_currency() -> String {
    CURRENCIES
        .choose(&mut rand::thread_rng())
        .map(|code| code.to_string())
        .unwrap_or_else(|| "USD".to_string())
}

pub fn random_create_params() -> CreateAccountParams {
    CreateAccountParams {
        owner: random_owner(),
        balance: random_money(),
        currency: random_currency(),
    }
}

/// Creates a random account and checks the store echoed the input.
pub fn create_random_account(repo: &impl AccountRepository) -> Account {
    let params = random_create_params();
    let account = repo.create_account(&params).unwrap();

    assert_eq!(account.owner, params.owner);
    assert_eq!(account.balance, params.balance);
    assert_eq!(account.currency, params.currency);
    assert!(account.id > 0);
    assert!(account.created_at > 0);
    account
}
