//! Typed data access for SimpleBank accounts.
//! This crate owns the `account` table and every invariant around it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::account::{Account, AccountId, AccountValidationError};
pub use repo::account_repo::{
    AccountRepository, AddAccountBalanceParams, CreateAccountParams, ListAccountsParams,
    RepoError, RepoResult, SqliteAccountRepository, UpdateAccountParams, ACCOUNTS_LIMIT_MAX,
};
pub use service::account_service::AccountService;
