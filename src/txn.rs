//! Retryable transaction boundary.
//!
//! CockroachDB may ask the client to retry a transaction when it detects
//! read/write contention (SQLSTATE 40001). [`execute_txn`] wraps a unit of
//! work in a SERIALIZABLE transaction and re-runs it on such conflicts, so
//! callers write their SQL once and stay oblivious to retries.

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

use crate::error::BankError;

/// Attempt cap for one unit of work, counting the first run.
const MAX_ATTEMPTS: u32 = 5;

/// Backoff before the first retry; doubles per attempt up to [`MAX_BACKOFF`].
const INITIAL_BACKOFF: Duration = Duration::from_millis(50);
const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// Run `op` inside a SERIALIZABLE transaction, retrying on conflicts.
///
/// Each attempt gets a fresh transaction; the previous one is rolled back
/// before the re-run, so `op` must keep all its effects inside the
/// transaction. Domain errors (insufficient funds, missing accounts) and
/// non-conflict transport errors propagate immediately without a retry.
/// A conflict on the final attempt is returned to the caller.
pub async fn execute_txn<T, F>(pool: &PgPool, op: F) -> Result<T, BankError>
where
    F: for<'t> Fn(&'t mut Transaction<'static, Postgres>) -> BoxFuture<'t, Result<T, BankError>>,
{
    let mut attempt = 1u32;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| BankError::db("beginning transaction", e))?;

        // The sufficiency check in the transfer protocol is check-then-act;
        // it is only sound at this isolation level.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(|e| BankError::db("setting isolation level", e))?;

        let result = match op(&mut tx).await {
            Ok(value) => tx
                .commit()
                .await
                .map(|_| value)
                .map_err(|e| BankError::db("committing transaction", e)),
            Err(err) => {
                // The original error is what the caller needs; a failed
                // rollback only gets logged.
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!("transaction rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        };

        match result {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "serialization conflict, retrying transaction: {}",
                    err
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const TEST_DATABASE_URL: &str = "postgres://root@127.0.0.1:26257/bank?sslmode=disable";

    #[tokio::test]
    #[ignore] // Requires CockroachDB running
    async fn test_successful_op_commits_on_first_attempt() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect(TEST_DATABASE_URL)
            .await
            .expect("Failed to connect");

        let attempts = AtomicU32::new(0);
        let result = execute_txn(&pool, |tx| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                sqlx::query("SELECT 1")
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| BankError::db("probe query", e))?;
                Ok(42)
            })
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[ignore]
    async fn test_domain_error_is_not_retried() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect(TEST_DATABASE_URL)
            .await
            .expect("Failed to connect");

        let attempts = AtomicU32::new(0);
        let result: Result<(), BankError> = execute_txn(&pool, |_tx| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(BankError::InvalidAmount) })
        })
        .await;

        assert!(matches!(result, Err(BankError::InvalidAmount)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
