//! Balance transfer protocol.
//!
//! Three dependent statements per attempt: read the source balance, debit
//! the source, credit the destination. The sufficiency check between the
//! read and the writes is check-then-act; it is sound because the whole
//! body runs inside one SERIALIZABLE transaction supplied by [`crate::txn`].

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::db::Database;
use crate::error::BankError;
use crate::txn;

/// Funds transfer between two accounts
pub struct TransferService;

impl TransferService {
    /// Move `amount` from `from` to `to` under the transaction retry boundary.
    ///
    /// The body may be re-invoked on serialization conflicts, so it keeps
    /// every effect inside the transaction. Insufficient funds and missing
    /// accounts abort without a retry.
    pub async fn execute(
        db: &Database,
        from: Uuid,
        to: Uuid,
        amount: i64,
    ) -> Result<(), BankError> {
        validate_request(from, to, amount)?;

        txn::execute_txn(db.pool(), move |tx| {
            Box::pin(transfer_funds(tx, from, to, amount))
        })
        .await
    }
}

fn validate_request(from: Uuid, to: Uuid, amount: i64) -> Result<(), BankError> {
    if amount <= 0 {
        return Err(BankError::InvalidAmount);
    }
    if from == to {
        return Err(BankError::SameAccount);
    }
    Ok(())
}

/// One transfer attempt. The caller owns commit and rollback.
async fn transfer_funds(
    tx: &mut Transaction<'static, Postgres>,
    from: Uuid,
    to: Uuid,
    amount: i64,
) -> Result<(), BankError> {
    let balance = sqlx::query_scalar::<_, i64>("SELECT balance FROM accounts WHERE id = $1")
        .bind(from)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| BankError::db("reading source balance", e))?
        .ok_or(BankError::AccountNotFound(from))?;

    if balance < amount {
        return Err(BankError::InsufficientFunds {
            account: from,
            balance,
            requested: amount,
        });
    }

    let debited = sqlx::query("UPDATE accounts SET balance = balance - $1 WHERE id = $2")
        .bind(amount)
        .bind(from)
        .execute(&mut **tx)
        .await
        .map_err(|e| BankError::db("debiting source account", e))?;
    if debited.rows_affected() == 0 {
        return Err(BankError::AccountNotFound(from));
    }

    let credited = sqlx::query("UPDATE accounts SET balance = balance + $1 WHERE id = $2")
        .bind(amount)
        .bind(to)
        .execute(&mut **tx)
        .await
        .map_err(|e| BankError::db("crediting destination account", e))?;
    if credited.rows_affected() == 0 {
        return Err(BankError::AccountNotFound(to));
    }

    Ok(())
}
