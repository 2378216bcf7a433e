//! Data models for the bank ledger

use sqlx::FromRow;
use uuid::Uuid;

/// A bank account row: opaque identifier plus signed integer balance.
///
/// Balances are whole currency units. A transfer must never drive one
/// negative; the transfer protocol checks sufficiency before mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub balance: i64,
}

impl Account {
    /// A fresh account with a random identifier and the given opening balance
    pub fn new(balance: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            balance,
        }
    }
}
