//! Store contracts and SQLite persistence implementations.
//!
//! # Responsibility
//! - Define one data-access contract per entity.
//! - Isolate SQL details from seeding and other callers.
//!
//! # Invariants
//! - Stores validate fields before persistence.
//! - Stores return semantic errors (`NotFound`, `ConstraintViolation`,
//!   `ConnectionFailure`) in addition to DB transport errors.
//! - Every operation is a single attempt; callers own retries.

pub mod account_repo;
pub mod error;
pub mod profile_repo;
mod schema;
