//! Account use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Repository errors are returned unchanged.
//! - Owner names are never written to logs.

use crate::model::account::{Account, AccountId};
use crate::repo::account_repo::{
    AccountRepository, AddAccountBalanceParams, CreateAccountParams, ListAccountsParams,
    RepoError, RepoResult, UpdateAccountParams,
};
use log::{debug, error, info, warn};

/// Use-case service wrapper for account CRUD operations.
pub struct AccountService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Opens a new account with a starting balance.
    pub fn create_account(&self, params: &CreateAccountParams) -> RepoResult<Account> {
        let result = self.repo.create_account(params);
        match &result {
            Ok(account) => info!(
                "event=account_create module=account status=ok account_id={} currency={}",
                account.id, account.currency
            ),
            Err(err) => log_failure("account_create", None, err),
        }
        result
    }

    /// Gets one account by id.
    pub fn get_account(&self, id: AccountId) -> RepoResult<Account> {
        let result = self.repo.get_account(id);
        match &result {
            Ok(_) => debug!("event=account_get module=account status=ok account_id={id}"),
            Err(err) => log_failure("account_get", Some(id), err),
        }
        result
    }

    /// Replaces the balance of an existing account.
    pub fn update_account(&self, params: &UpdateAccountParams) -> RepoResult<Account> {
        let result = self.repo.update_account(params);
        match &result {
            Ok(_) => info!(
                "event=account_update module=account status=ok account_id={}",
                params.id
            ),
            Err(err) => log_failure("account_update", Some(params.id), err),
        }
        result
    }

    /// Adds a signed amount to the balance of an existing account.
    pub fn add_account_balance(&self, params: &AddAccountBalanceParams) -> RepoResult<Account> {
        let result = self.repo.add_account_balance(params);
        match &result {
            Ok(_) => info!(
                "event=account_add_balance module=account status=ok account_id={}",
                params.id
            ),
            Err(err) => log_failure("account_add_balance", Some(params.id), err),
        }
        result
    }

    /// Deletes an account by id. Unknown ids are not an error.
    pub fn delete_account(&self, id: AccountId) -> RepoResult<()> {
        let result = self.repo.delete_account(id);
        match &result {
            Ok(()) => info!("event=account_delete module=account status=ok account_id={id}"),
            Err(err) => log_failure("account_delete", Some(id), err),
        }
        result
    }

    /// Lists one page of accounts ordered by id.
    pub fn list_accounts(&self, params: &ListAccountsParams) -> RepoResult<Vec<Account>> {
        let result = self.repo.list_accounts(params);
        match &result {
            Ok(accounts) => debug!(
                "event=account_list module=account status=ok limit={} offset={} count={}",
                params.limit,
                params.offset,
                accounts.len()
            ),
            Err(err) => log_failure("account_list", None, err),
        }
        result
    }
}

fn log_failure(event: &str, id: Option<AccountId>, err: &RepoError) {
    let id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match err {
        RepoError::NotFound(_)
        | RepoError::Validation(_)
        | RepoError::InvalidLimit { .. }
        | RepoError::BalanceOverflow { .. } => warn!(
            "event={event} module=account status=error account_id={id} error_code={} error={err}",
            error_code(err)
        ),
        _ => error!(
            "event={event} module=account status=error account_id={id} error_code={} error={err}",
            error_code(err)
        ),
    }
}

fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::NotFound(_) => "not_found",
        RepoError::Validation(_) => "validation_failed",
        RepoError::InvalidLimit { .. } => "invalid_limit",
        RepoError::BalanceOverflow { .. } => "balance_overflow",
        RepoError::Db(_) => "db_failed",
        RepoError::InvalidData(_) => "invalid_data",
        RepoError::UninitializedConnection { .. }
        | RepoError::MissingRequiredTable(_)
        | RepoError::MissingRequiredColumn { .. } => "schema_mismatch",
    }
}
