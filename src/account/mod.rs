//! Account storage module
//!
//! CockroachDB-backed storage for bank accounts: connection pooling, schema
//! bootstrap, batched inserts and balance transfers.

pub mod db;
pub mod models;
pub mod repository;
pub mod statement;
pub mod transfer;

// Re-export commonly used types
pub use db::Database;
pub use models::Account;
pub use repository::AccountRepository;
pub use transfer::TransferService;
