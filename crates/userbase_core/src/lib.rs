//! Persistence layer for accounts and their profiles.
//!
//! Stores own every write rule (identifiers, creation timestamps, uniqueness);
//! callers only supply field values.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, open_target, DbError, DbTarget};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountId, NewAccount};
pub use model::profile::{NewProfile, Profile, ProfileId};
pub use model::validation::ValidationError;
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::error::{ConstraintViolation, RecordKey, RepoError, RepoResult};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use service::seed_service::{
    SeedReport, SeedSample, SeedService, SeededAccount, DEFAULT_SEED_SAMPLES,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
