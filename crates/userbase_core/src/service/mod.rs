//! Use-case services orchestrating store calls.
//!
//! # Responsibility
//! - Compose account and profile store operations into startup use-cases.
//! - Stay storage-agnostic by depending on store traits only.

pub mod seed_service;
