use thiserror::Error;
use uuid::Uuid;

/// SQLSTATE reported by CockroachDB when a transaction hit read/write
/// contention and must be retried by the client.
pub const SERIALIZATION_FAILURE: &str = "40001";

#[derive(Debug, Error)]
pub enum BankError {
    #[error("at least 1 account needed for insertion")]
    EmptyBatch,

    #[error("transfer amount must be positive")]
    InvalidAmount,

    #[error("source and destination accounts are the same")]
    SameAccount,

    #[error("account {0} not found")]
    AccountNotFound(Uuid),

    #[error("insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: Uuid,
        balance: i64,
        requested: i64,
    },

    #[error("{op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl BankError {
    /// Wrap a driver error with the name of the failing operation.
    pub fn db(op: &'static str, source: sqlx::Error) -> Self {
        Self::Database { op, source }
    }

    /// Whether the transaction boundary may re-run the unit of work.
    ///
    /// Only serialization conflicts qualify. Domain failures (insufficient
    /// funds, missing accounts) and other transport errors propagate as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database {
                source: sqlx::Error::Database(db_err),
                ..
            } => db_err.code().as_deref() == Some(SERIALIZATION_FAILURE),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_not_retryable() {
        let account = Uuid::new_v4();

        assert!(!BankError::EmptyBatch.is_retryable());
        assert!(!BankError::InvalidAmount.is_retryable());
        assert!(!BankError::SameAccount.is_retryable());
        assert!(!BankError::AccountNotFound(account).is_retryable());
        assert!(
            !BankError::InsufficientFunds {
                account,
                balance: 50,
                requested: 100,
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_plain_transport_errors_are_not_retryable() {
        let err = BankError::db("reading source balance", sqlx::Error::RowNotFound);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_database_error_keeps_operation_context() {
        let err = BankError::db("inserting accounts", sqlx::Error::PoolTimedOut);
        assert!(err.to_string().starts_with("inserting accounts:"));
    }
}
