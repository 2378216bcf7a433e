//! roach-bank - CockroachDB Account Ledger Demo
//!
//! A small bank ledger over CockroachDB, built on sqlx.
//!
//! # Modules
//!
//! - [`account`] - Account storage: pool, models, batched inserts, transfers
//! - [`txn`] - Retryable transaction boundary (SQLSTATE 40001 handling)
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing setup (file + stdout)
//! - [`error`] - Domain and transport error types

pub mod account;
pub mod config;
pub mod error;
pub mod logging;
pub mod txn;

// Convenient re-exports at crate root
pub use account::{Account, AccountRepository, Database, TransferService};
pub use error::BankError;
pub use txn::execute_txn;
