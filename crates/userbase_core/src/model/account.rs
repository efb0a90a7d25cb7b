//! Account domain model.
//!
//! # Responsibility
//! - Define the identity/contact record and its creation input.
//! - Validate required and bounded-length fields before persistence.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `email` is unique across accounts (enforced by the store).
//! - `created_at` is assigned once by the store and never rewritten.

use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned account identifier.
pub type AccountId = i64;

pub const EMAIL_MAX_CHARS: usize = 100;
pub const FULL_NAME_MAX_CHARS: usize = 100;

/// Input for creating an account. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub full_name: String,
}

impl NewAccount {
    pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: full_name.into(),
        }
    }

    /// Checks required and bounded-length fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.email, &self.full_name)
    }
}

/// Persisted account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Exact-match lookup key. Case-sensitive.
    pub email: String,
    pub full_name: String,
    /// Unix epoch milliseconds, set by the store immediately before insert.
    pub created_at: i64,
}

impl Account {
    /// Checks required and bounded-length fields.
    ///
    /// `id` and `created_at` are not checked; the store owns them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.email, &self.full_name)
    }
}

fn validate_fields(email: &str, full_name: &str) -> Result<(), ValidationError> {
    require_text("email", email, EMAIL_MAX_CHARS)?;
    require_text("full_name", full_name, FULL_NAME_MAX_CHARS)?;
    Ok(())
}
