//! Store configuration.
//!
//! # Responsibility
//! - Resolve where the account database lives and how logging is set up.
//! - Read `SIMPLEBANK_*` environment variables, then layer explicit values
//!   (e.g. command-line flags) on top.
//!
//! # Invariants
//! - Blank values count as unset, whether they come from the environment
//!   or from an override.
//! - A missing database path means an in-memory database.
//! - Logging stays disabled unless a log directory is configured.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SIMPLEBANK_DB";
pub const ENV_LOG_LEVEL: &str = "SIMPLEBANK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SIMPLEBANK_LOG_DIR";

/// Settings needed to open the account store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file. `None` opens a private in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Builds a config from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| non_blank(lookup(key));
        let defaults = Self::default();

        Self {
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Replaces each setting for which a non-blank value is given.
    pub fn with_overrides(
        self,
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Self {
        let non_blank_path =
            |path: Option<PathBuf>| path.filter(|path| !path.as_os_str().is_empty());

        Self {
            db_path: non_blank_path(db_path).or(self.db_path),
            log_level: non_blank(log_level).unwrap_or(self.log_level),
            log_dir: non_blank_path(log_dir).or(self.log_dir),
        }
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(&self.log_level, dir),
            None => Ok(()),
        }
    }

    /// Opens the configured database with migrations applied.
    pub fn open(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
