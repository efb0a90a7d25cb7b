//! Domain records persisted by the stores.
//!
//! # Responsibility
//! - Define the account and profile shapes shared by stores and callers.
//! - Keep field rules (required, bounded length) next to the records.
//!
//! # Invariants
//! - Identifiers are assigned by the store, never by callers.
//! - `Account::created_at` is assigned once by the store.

pub mod account;
pub mod profile;
pub mod validation;
