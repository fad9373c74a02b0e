//! Domain model for bank accounts.
//!
//! # Responsibility
//! - Define canonical data structures used by the account store.
//! - Own field-level validation shared by write and read paths.
//!
//! # Invariants
//! - Every account is identified by a store-assigned `AccountId`.
//! - Deletion is a hard delete; deleted ids are never handed out again.

pub mod account;
