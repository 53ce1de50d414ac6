//! Basic usage example.
//!
//! Authenticates with a refresh token, picks a budget and prints its
//! accounts, expense buckets and the last week of transactions.
//!
//! Run with:
//! DASBUDGET_REFRESH_TOKEN=... DASBUDGET_API_KEY=... cargo run --example basic_usage

use dasbudget_rs::{DasBudgetClient, TransactionsQuery};

#[tokio::main]
async fn main() -> dasbudget_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = DasBudgetClient::from_env()?;
    client.initialize().await?;
    println!("Successfully authenticated!");

    let budgets = client.budgets().list().await?;
    println!("\nFound {} budget(s):", budgets.len());
    for budget in &budgets {
        println!("  - {} ({})", budget.name, budget.id);
    }

    // Stick to the first budget unless one was configured
    if client.budget_id().is_none() {
        if let Some(budget) = budgets.first() {
            client.set_budget_id(Some(budget.id.clone()));
        }
    }

    let accounts = client.accounts().list(None).await?;
    println!("\nAccounts:");
    for account in &accounts {
        println!(
            "  - {} ({:?}): {:?}",
            account.name, account.kind, account.current_balance
        );
    }

    let expenses = client.buckets().expenses(None).await?;
    println!("\nExpenses:");
    for bucket in &expenses {
        println!(
            "  - {}: {:?} of {:?}",
            bucket.name, bucket.current_amount, bucket.target_amount
        );
    }

    let week_ago = chrono::Utc::now() - chrono::Duration::days(7);
    let recent = client
        .transactions()
        .list(TransactionsQuery::since_time(week_ago))
        .await?;
    println!("\n{} transaction(s) in the last week:", recent.len());
    for txn in &recent {
        println!(
            "  - {} {}: {:?}",
            txn.created_at.format("%Y-%m-%d"),
            txn.merchant_name().unwrap_or("(unknown)"),
            txn.amount
        );
    }

    println!("\nDone!");
    Ok(())
}
