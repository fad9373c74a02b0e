//! SimpleBank CLI - account store operations from the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use simplebank_core::config::ENV_DB_PATH;
use simplebank_core::db::close_db;
use simplebank_core::{
    Account, AccountId, AccountService, AddAccountBalanceParams, CreateAccountParams,
    ListAccountsParams, RepoError, SqliteAccountRepository, StoreConfig, UpdateAccountParams,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;

/// SimpleBank - manage accounts in a local SQLite database
///
/// Flags override the SIMPLEBANK_DB, SIMPLEBANK_LOG_LEVEL and
/// SIMPLEBANK_LOG_DIR environment variables.
#[derive(Parser)]
#[command(name = "simplebank", version, about, long_about = None)]
struct Cli {
    /// Database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for log files; logging is off when unset
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account
    Create {
        #[arg(long)]
        owner: String,
        /// Starting balance in minor units
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        balance: i64,
        /// Three-letter currency code
        #[arg(long)]
        currency: String,
    },

    /// Show one account
    Get { id: AccountId },

    /// Replace an account balance
    Update {
        id: AccountId,
        #[arg(long, allow_hyphen_values = true)]
        balance: i64,
    },

    /// Add a signed amount to an account balance
    AddBalance {
        id: AccountId,
        #[arg(long, allow_hyphen_values = true)]
        amount: i64,
    },

    /// Delete an account
    Delete { id: AccountId },

    /// List accounts ordered by id
    List {
        /// Only accounts held by this owner
        #[arg(long)]
        owner: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status_for(&err))
        }
    }
}

/// Missing accounts exit with 2, every other failure with 1.
fn exit_status_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RepoError>() {
        Some(RepoError::NotFound(_)) => EXIT_NOT_FOUND,
        _ => EXIT_FAILURE,
    }
}

fn resolve_config(cli: &Cli, base: StoreConfig) -> Result<StoreConfig> {
    let config = base.with_overrides(cli.db.clone(), cli.log_level.clone(), cli.log_dir.clone());
    if config.db_path.is_none() {
        bail!("no database configured; pass --db or set {ENV_DB_PATH}");
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli, StoreConfig::from_env())?;
    config.init_logging().context("failed to initialize logging")?;

    let conn = config.open().context("failed to open database")?;
    let outcome = execute(&conn, cli.command, cli.json);
    close_db(conn).context("failed to close database")?;
    outcome
}

fn execute(conn: &Connection, command: Commands, json: bool) -> Result<()> {
    let service = AccountService::new(SqliteAccountRepository::try_new(conn)?);

    match command {
        Commands::Create {
            owner,
            balance,
            currency,
        } => {
            let account = service.create_account(&CreateAccountParams {
                owner,
                balance,
                currency,
            })?;
            print_accounts(&[account], json)
        }
        Commands::Get { id } => {
            let account = service.get_account(id)?;
            print_accounts(&[account], json)
        }
        Commands::Update { id, balance } => {
            let account = service.update_account(&UpdateAccountParams { id, balance })?;
            print_accounts(&[account], json)
        }
        Commands::AddBalance { id, amount } => {
            let account = service.add_account_balance(&AddAccountBalanceParams { id, amount })?;
            print_accounts(&[account], json)
        }
        Commands::Delete { id } => {
            service.delete_account(id)?;
            if json {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!("deleted account {id}");
            }
            Ok(())
        }
        Commands::List {
            owner,
            limit,
            offset,
        } => {
            let accounts = service.list_accounts(&ListAccountsParams {
                owner,
                limit,
                offset,
            })?;
            print_accounts(&accounts, json)
        }
    }
}

fn print_accounts(accounts: &[Account], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(accounts)?);
        return Ok(());
    }

    for account in accounts {
        println!(
            "{:>6}  {:<20}  {:>14}  {}  created_at={}",
            account.id, account.owner, account.balance, account.currency, account.created_at
        );
    }
    Ok(())
}
