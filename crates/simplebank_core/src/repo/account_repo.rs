//! Account repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide typed CRUD and pagination APIs over the `account` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every operation is a single statement, so it is atomic to other
//!   connections.
//! - Write paths validate input before any SQL runs.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing is ordered by `id` ascending.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::account::{
    validate_currency, validate_owner, Account, AccountId, AccountValidationError,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound accepted for `ListAccountsParams::limit`.
pub const ACCOUNTS_LIMIT_MAX: u32 = 1000;

const ACCOUNT_TABLE: &str = "account";
const ACCOUNT_REQUIRED_COLUMNS: &[&str] = &["id", "owner", "balance", "currency", "created_at"];

const ACCOUNT_COLUMNS_SQL: &str = "id, owner, balance, currency, created_at";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for account persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AccountValidationError),
    Db(DbError),
    NotFound(AccountId),
    InvalidLimit {
        limit: u32,
        max: u32,
    },
    BalanceOverflow {
        id: AccountId,
        balance: i64,
        amount: i64,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "account not found: {id}"),
            Self::InvalidLimit { limit, max } => {
                write!(f, "list limit {limit} out of range; expected 1..={max}")
            }
            Self::BalanceOverflow {
                id,
                balance,
                amount,
            } => write!(
                f,
                "adding {amount} to balance {balance} of account {id} overflows"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted account data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidLimit { .. }
            | Self::BalanceOverflow { .. }
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<AccountValidationError> for RepoError {
    fn from(value: AccountValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Input for creating an account. `id` and `created_at` come from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountParams {
    pub owner: String,
    pub balance: i64,
    pub currency: String,
}

/// Input for replacing an account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateAccountParams {
    pub id: AccountId,
    pub balance: i64,
}

/// Input for adding a signed amount to an account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddAccountBalanceParams {
    pub id: AccountId,
    pub amount: i64,
}

/// Pagination and filter options for listing accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAccountsParams {
    /// Optional exact owner match, applied before pagination.
    pub owner: Option<String>,
    /// Maximum rows to return, `1..=ACCOUNTS_LIMIT_MAX`.
    pub limit: u32,
    /// Number of leading rows to skip.
    pub offset: u32,
}

impl ListAccountsParams {
    /// Unfiltered page of `limit` rows starting at `offset`.
    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            owner: None,
            limit,
            offset,
        }
    }
}

/// Repository interface for account CRUD operations.
pub trait AccountRepository {
    /// Inserts a new account and returns the stored record.
    fn create_account(&self, params: &CreateAccountParams) -> RepoResult<Account>;
    /// Fetches one account, failing with `NotFound` when absent.
    fn get_account(&self, id: AccountId) -> RepoResult<Account>;
    /// Replaces the balance of an existing account.
    fn update_account(&self, params: &UpdateAccountParams) -> RepoResult<Account>;
    /// Adds `amount` to the balance of an existing account.
    fn add_account_balance(&self, params: &AddAccountBalanceParams) -> RepoResult<Account>;
    /// Deletes an account. Deleting an unknown id succeeds.
    fn delete_account(&self, id: AccountId) -> RepoResult<()>;
    /// Lists accounts ordered by id ascending.
    fn list_accounts(&self, params: &ListAccountsParams) -> RepoResult<Vec<Account>>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Wraps a connection after checking it carries the account schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this repository queries.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_account_schema(conn)?;
        Ok(Self { conn })
    }

    fn query_one<P: Params>(&self, sql: &str, params: P) -> RepoResult<Option<Account>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }

        Ok(None)
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, params: &CreateAccountParams) -> RepoResult<Account> {
        validate_owner(&params.owner)?;
        validate_currency(&params.currency)?;

        let created = self.query_one(
            &format!(
                "INSERT INTO account (owner, balance, currency)
                 VALUES (?1, ?2, ?3)
                 RETURNING {ACCOUNT_COLUMNS_SQL};"
            ),
            params![params.owner.as_str(), params.balance, params.currency.as_str()],
        )?;

        created.ok_or_else(|| RepoError::InvalidData("insert returned no row".to_string()))
    }

    fn get_account(&self, id: AccountId) -> RepoResult<Account> {
        self.query_one(
            &format!("SELECT {ACCOUNT_COLUMNS_SQL} FROM account WHERE id = ?1;"),
            [id],
        )?
        .ok_or(RepoError::NotFound(id))
    }

    fn update_account(&self, params: &UpdateAccountParams) -> RepoResult<Account> {
        self.query_one(
            &format!(
                "UPDATE account
                 SET balance = ?2
                 WHERE id = ?1
                 RETURNING {ACCOUNT_COLUMNS_SQL};"
            ),
            params![params.id, params.balance],
        )?
        .ok_or(RepoError::NotFound(params.id))
    }

    fn add_account_balance(&self, params: &AddAccountBalanceParams) -> RepoResult<Account> {
        // SQLite silently promotes overflowing integer arithmetic to REAL,
        // so the bound check has to live in the WHERE clause.
        let updated = self.query_one(
            &format!(
                "UPDATE account
                 SET balance = balance + ?2
                 WHERE id = ?1
                   AND ((?2 >= 0 AND balance <= ?3 - ?2)
                     OR (?2 < 0 AND balance >= ?4 - ?2))
                 RETURNING {ACCOUNT_COLUMNS_SQL};"
            ),
            params![params.id, params.amount, i64::MAX, i64::MIN],
        )?;

        match updated {
            Some(account) => Ok(account),
            None => {
                // Second read only tells a missing row apart from a rejected sum.
                // A delete racing in between surfaces as `NotFound`.
                let current = self.get_account(params.id)?;
                Err(RepoError::BalanceOverflow {
                    id: params.id,
                    balance: current.balance,
                    amount: params.amount,
                })
            }
        }
    }

    fn delete_account(&self, id: AccountId) -> RepoResult<()> {
        self.conn.execute("DELETE FROM account WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn list_accounts(&self, params: &ListAccountsParams) -> RepoResult<Vec<Account>> {
        if params.limit == 0 || params.limit > ACCOUNTS_LIMIT_MAX {
            return Err(RepoError::InvalidLimit {
                limit: params.limit,
                max: ACCOUNTS_LIMIT_MAX,
            });
        }

        let mut sql = format!("SELECT {ACCOUNT_COLUMNS_SQL} FROM account");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(owner) = &params.owner {
            sql.push_str(" WHERE owner = ?");
            bind_values.push(Value::Text(owner.clone()));
        }

        sql.push_str(" ORDER BY id ASC LIMIT ? OFFSET ?;");
        bind_values.push(Value::Integer(i64::from(params.limit)));
        bind_values.push(Value::Integer(i64::from(params.offset)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut accounts = Vec::new();

        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }

        Ok(accounts)
    }
}

fn ensure_account_schema(conn: &Connection) -> RepoResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([ACCOUNT_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(ACCOUNT_TABLE));
    }

    for &column in ACCOUNT_REQUIRED_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: ACCOUNT_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let account = Account {
        id: row.get("id")?,
        owner: row.get("owner")?,
        balance: row.get("balance")?,
        currency: row.get("currency")?,
        created_at: row.get("created_at")?,
    };

    account.validate().map_err(|err| {
        RepoError::InvalidData(format!("account {} failed validation: {err}", account.id))
    })?;
    Ok(account)
}
