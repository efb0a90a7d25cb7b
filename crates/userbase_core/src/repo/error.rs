//! Error vocabulary shared by the account and profile stores.
//!
//! # Invariants
//! - Engine constraint failures surface as `ConstraintViolation`, never `Db`.
//! - Unreachable/unusable database files surface as `ConnectionFailure`.

use crate::db::DbError;
use crate::model::account::AccountId;
use crate::model::profile::ProfileId;
use crate::model::validation::ValidationError;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Lookup key that produced a miss.
///
/// `Display` never renders the email value; match on the variant to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    AccountId(AccountId),
    AccountEmail(String),
    ProfileId(ProfileId),
    ProfileAccountId(AccountId),
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountId(id) => write!(f, "account id={id}"),
            Self::AccountEmail(_) => write!(f, "account email=<redacted>"),
            Self::ProfileId(id) => write!(f, "profile id={id}"),
            Self::ProfileAccountId(id) => write!(f, "profile account_id={id}"),
        }
    }
}

/// Rule that rejected a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Required or bounded-length field rule, checked before SQL runs.
    Field(ValidationError),
    /// Unique index rejected the write. Holds `table.column`.
    Unique(String),
    /// Referenced row is missing, or a referencing row still exists.
    ForeignKey,
    /// Any other engine-reported constraint (CHECK, NOT NULL, trigger abort).
    Other(String),
}

impl ConstraintViolation {
    fn from_sqlite_error(err: &rusqlite::Error) -> Self {
        let rusqlite::Error::SqliteFailure(failure, message) = err else {
            return Self::Other(err.to_string());
        };
        let message = message.clone().unwrap_or_else(|| failure.to_string());

        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                let column = message
                    .strip_prefix("UNIQUE constraint failed: ")
                    .unwrap_or(message.as_str());
                Self::Unique(column.to_string())
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKey,
            _ => Self::Other(message),
        }
    }
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(err) => write!(f, "{err}"),
            Self::Unique(column) => write!(f, "duplicate value for unique `{column}`"),
            Self::ForeignKey => write!(f, "foreign key constraint failed"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

/// Error returned by store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Lookup found no matching row.
    NotFound(RecordKey),
    /// Uniqueness, reference, or required-field rule rejected a write.
    ConstraintViolation(ConstraintViolation),
    /// Database file cannot be opened, is locked, or is not a database.
    ConnectionFailure(DbError),
    /// Any other engine failure.
    Db(DbError),
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
    /// System clock reads earlier than the Unix epoch, so no creation time
    /// can be assigned.
    ClockBeforeEpoch(std::time::SystemTimeError),
    /// Connection schema is not at the expected bootstrapped version.
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

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "record not found: {key}"),
            Self::ConstraintViolation(violation) => {
                write!(f, "constraint violation: {violation}")
            }
            Self::ConnectionFailure(err) => write!(f, "database unavailable: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::ClockBeforeEpoch(err) => write!(f, "system clock before unix epoch: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "store requires table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "store requires column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConstraintViolation(ConstraintViolation::Field(err)) => Some(err),
            Self::ConnectionFailure(err) | Self::Db(err) => Some(err),
            Self::ClockBeforeEpoch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::ConstraintViolation(ConstraintViolation::Field(value))
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => {
                Self::ConstraintViolation(ConstraintViolation::from_sqlite_error(&value))
            }
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::SystemIoFailure,
            ) => Self::ConnectionFailure(DbError::Sqlite(value)),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConstraintViolation, RecordKey, RepoError};
    use crate::db::DbError;
    use rusqlite::ffi;

    fn sqlite_failure(extended_code: i32, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(extended_code), Some(message.to_string()))
    }

    #[test]
    fn unique_failure_maps_to_unique_column() {
        let err = RepoError::from(sqlite_failure(
            ffi::SQLITE_CONSTRAINT_UNIQUE,
            "UNIQUE constraint failed: accounts.email",
        ));
        assert!(matches!(
            err,
            RepoError::ConstraintViolation(ConstraintViolation::Unique(ref column))
                if column == "accounts.email"
        ));
    }

    #[test]
    fn foreign_key_failure_maps_to_foreign_key() {
        let err = RepoError::from(sqlite_failure(
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            "FOREIGN KEY constraint failed",
        ));
        assert!(matches!(
            err,
            RepoError::ConstraintViolation(ConstraintViolation::ForeignKey)
        ));
    }

    #[test]
    fn busy_and_cannot_open_map_to_connection_failure() {
        for code in [ffi::SQLITE_BUSY, ffi::SQLITE_CANTOPEN, ffi::SQLITE_NOTADB] {
            let err = RepoError::from(sqlite_failure(code, "unavailable"));
            assert!(
                matches!(err, RepoError::ConnectionFailure(_)),
                "code {code} should map to connection failure"
            );
        }
    }

    #[test]
    fn other_engine_errors_stay_generic() {
        let err = RepoError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
    }

    #[test]
    fn not_found_display_names_the_lookup_key() {
        let err = RepoError::NotFound(RecordKey::ProfileId(7));
        assert_eq!(err.to_string(), "record not found: profile id=7");
        assert!(err.is_not_found());
    }

    #[test]
    fn email_lookup_miss_does_not_render_the_email() {
        let err = RepoError::NotFound(RecordKey::AccountEmail("a@x.se".to_string()));
        let rendered = err.to_string();
        assert_eq!(rendered, "record not found: account email=<redacted>");
        assert!(!rendered.contains("a@x.se"));
    }
}
