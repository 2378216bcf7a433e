//! roach-bank - CockroachDB Account Ledger Demo
//!
//! Flow:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│ Connect  │───▶│   Seed   │───▶│ Transfer │
//! │  (YAML)  │    │  (pool)  │    │ (insert) │    │ (retry)  │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Seeding and the transfer both run under the retryable transaction
//! boundary; CockroachDB may ask the client to re-run either on contention.

use roach_bank::account::{Account, AccountRepository, Database, TransferService};
use roach_bank::config::AppConfig;
use roach_bank::error::BankError;
use roach_bank::{logging, txn};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&config);

    tracing::info!("Starting roach-bank {} in {} mode", env!("GIT_HASH"), env);

    if let Err(err) = run(&config).await {
        tracing::error!("fatal: {}", err);
        std::process::exit(1);
    }
}

async fn run(config: &AppConfig) -> Result<(), BankError> {
    let db = Database::connect(&config.database_url).await?;

    AccountRepository::ensure_schema(db.pool()).await?;

    let accounts = vec![
        Account::new(250),
        Account::new(100),
        Account::new(500),
        Account::new(300),
    ];

    let inserted = txn::execute_txn(db.pool(), |tx| {
        let accounts = accounts.clone();
        Box::pin(async move { AccountRepository::insert_batch(tx, &accounts).await })
    })
    .await?;
    tracing::info!("inserted {} accounts", inserted);

    print_balances("Initial balances", &db).await?;

    let from = accounts[0].id;
    let to = accounts[1].id;
    let amount = 100;

    TransferService::execute(&db, from, to, amount).await?;
    tracing::info!(%from, %to, amount, "transfer successful");

    print_balances("Balances after transfer", &db).await?;

    Ok(())
}

async fn print_balances(label: &str, db: &Database) -> Result<(), BankError> {
    println!("{}:", label);
    for account in AccountRepository::list_all(db.pool()).await? {
        println!("{} {}", account.id, account.balance);
    }
    Ok(())
}
