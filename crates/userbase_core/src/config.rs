//! Process configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve the database location, log level and log directory.
//! - Reject malformed values before any connection or logger is created.
//!
//! # Invariants
//! - Blank values behave the same as unset values.
//! - A configured log directory is always absolute.

use crate::db::DbTarget;
use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// SQLite file path. Unset or blank selects an in-memory database.
pub const DB_PATH_ENV: &str = "USERBASE_DB_PATH";
/// One of `trace|debug|info|warn|error`.
pub const LOG_LEVEL_ENV: &str = "USERBASE_LOG_LEVEL";
/// Absolute directory for rolling log files. Unset disables file logging.
pub const LOG_DIR_ENV: &str = "USERBASE_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    LogLevel(String),
    LogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LogLevel(message) => write!(f, "{LOG_LEVEL_ENV}: {message}"),
            Self::LogDir(message) => write!(f, "{LOG_DIR_ENV}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_target: DbTarget,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_target = match non_blank(DB_PATH_ENV) {
            Some(path) => DbTarget::File(PathBuf::from(path.trim())),
            None => DbTarget::Memory,
        };

        let log_level = match non_blank(LOG_LEVEL_ENV) {
            Some(level) => normalize_level(&level).map_err(ConfigError::LogLevel)?,
            None => default_log_level(),
        };

        let log_dir = non_blank(LOG_DIR_ENV)
            .map(|dir| normalize_log_dir(&dir).map_err(ConfigError::LogDir))
            .transpose()?;

        Ok(Self {
            db_target,
            log_level,
            log_dir,
        })
    }
}
