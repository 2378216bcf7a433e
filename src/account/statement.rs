//! Parameterized multi-row INSERT construction.

use sqlx::Arguments;
use sqlx::postgres::PgArguments;

use super::models::Account;
use crate::error::BankError;

/// Build the SQL text and bind arguments inserting a batch of accounts.
///
/// Placeholders are numbered sequentially from `$1`, two per row:
///
/// ```text
/// INSERT INTO accounts (id, balance) VALUES ($1, $2), ($3, $4), ...
/// ```
///
/// Arguments interleave id and balance in input order, so argument `2i+1`
/// is the i-th account's id and `2i+2` its balance. An empty batch is an
/// error, not a no-op: emitting `VALUES ` with no row groups would be
/// malformed SQL.
pub fn build_insert(accounts: &[Account]) -> Result<(String, PgArguments), BankError> {
    if accounts.is_empty() {
        return Err(BankError::EmptyBatch);
    }

    let mut sql = String::from("INSERT INTO accounts (id, balance) VALUES ");
    let mut args = PgArguments::default();

    for (i, account) in accounts.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));

        args.add(account.id)
            .map_err(|e| BankError::db("encoding account id", sqlx::Error::Encode(e)))?;
        args.add(account.balance)
            .map_err(|e| BankError::db("encoding account balance", sqlx::Error::Encode(e)))?;
    }

    Ok((sql, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts(n: usize) -> Vec<Account> {
        (0..n).map(|i| Account::new(50 * (i as i64 + 1))).collect()
    }

    #[test]
    fn test_single_account() {
        let (sql, args) = build_insert(&accounts(1)).unwrap();
        assert_eq!(sql, "INSERT INTO accounts (id, balance) VALUES ($1, $2)");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_two_accounts() {
        let (sql, args) = build_insert(&accounts(2)).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO accounts (id, balance) VALUES ($1, $2), ($3, $4)"
        );
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_five_accounts() {
        let (sql, args) = build_insert(&accounts(5)).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO accounts (id, balance) VALUES ($1, $2), ($3, $4), ($5, $6), ($7, $8), ($9, $10)"
        );
        assert_eq!(args.len(), 10);
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let result = build_insert(&[]);
        assert!(matches!(result, Err(BankError::EmptyBatch)));
    }

    #[test]
    fn test_placeholders_are_sequential_with_no_gaps() {
        let (sql, _) = build_insert(&accounts(12)).unwrap();
        for n in 1..=24 {
            assert!(
                sql.contains(&format!("${}", n)),
                "missing placeholder ${} in: {}",
                n,
                sql
            );
        }
        assert!(!sql.contains("$25"));
        assert!(!sql.ends_with(", "));
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let batch = accounts(3);
        let (sql_a, _) = build_insert(&batch).unwrap();
        let (sql_b, _) = build_insert(&batch).unwrap();
        assert_eq!(sql_a, sql_b);
    }
}
