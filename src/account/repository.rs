//! Repository layer for account persistence.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::Account;
use super::statement;
use crate::error::BankError;

/// Account repository for schema bootstrap and row access
pub struct AccountRepository;

impl AccountRepository {
    /// Create the accounts table if it does not exist yet
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), BankError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS accounts (
                   id UUID PRIMARY KEY,
                   balance BIGINT NOT NULL
               )"#,
        )
        .execute(pool)
        .await
        .map_err(|e| BankError::db("creating accounts table", e))?;

        Ok(())
    }

    /// Insert a batch of accounts as one multi-row statement.
    ///
    /// Runs on the caller's transaction so seeding participates in the
    /// surrounding retry boundary. Returns the number of rows written.
    pub async fn insert_batch(
        tx: &mut Transaction<'static, Postgres>,
        accounts: &[Account],
    ) -> Result<u64, BankError> {
        let (sql, args) = statement::build_insert(accounts)?;

        let result = sqlx::query_with(&sql, args)
            .execute(&mut **tx)
            .await
            .map_err(|e| BankError::db("inserting accounts", e))?;

        Ok(result.rows_affected())
    }

    /// Fetch every account, ordered by id for stable output
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Account>, BankError> {
        sqlx::query_as::<_, Account>("SELECT id, balance FROM accounts ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(|e| BankError::db("listing accounts", e))
    }

    /// Current balance of a single account
    pub async fn balance_of(pool: &PgPool, id: Uuid) -> Result<i64, BankError> {
        sqlx::query_scalar::<_, i64>("SELECT balance FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| BankError::db("reading balance", e))?
            .ok_or(BankError::AccountNotFound(id))
    }
}
