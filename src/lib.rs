//! # dasbudget-rs
//!
//! An async Rust client for the Das Budget personal budgeting API.
//!
//! This crate wraps the private JSON API behind the Das Budget web app:
//! transactions, buckets (expenses, goals and vaults), bank accounts,
//! linked institutions and budgets.
//!
//! ## Features
//!
//! - **Authentication**: refresh-token exchange with proactive renewal five
//!   minutes before expiry, single-flight under concurrency
//! - **Transactions**: newest page, or everything since a cutoff across pages
//! - **Budgets**: client-wide budget selection with per-call overrides
//! - **Buckets & Accounts**: typed models with `rust_decimal` amounts
//! - **Testable**: the HTTP transport and the debug observer are traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dasbudget_rs::{ClientConfig, DasBudgetClient, TransactionsQuery};
//!
//! #[tokio::main]
//! async fn main() -> dasbudget_rs::Result<()> {
//!     let client = DasBudgetClient::new(ClientConfig::new("refresh-token", "api-key"))?;
//!
//!     // Budgets the user can see
//!     let budgets = client.budgets().list().await?;
//!     println!("Found {} budgets", budgets.len());
//!
//!     // Expense buckets of the default budget
//!     for bucket in client.buckets().expenses(None).await? {
//!         println!("{}: {:?}", bucket.name, bucket.current_amount);
//!     }
//!
//!     // Newest page of transactions
//!     let latest = client.transactions().list(TransactionsQuery::new()).await?;
//!     println!("{} transactions on the first page", latest.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Transactions Since a Cutoff
//!
//! ```rust,no_run
//! use dasbudget_rs::{DasBudgetClient, TransactionsQuery, FREE_TO_SPEND};
//!
//! #[tokio::main]
//! async fn main() -> dasbudget_rs::Result<()> {
//!     let client = DasBudgetClient::from_env()?;
//!
//!     let yesterday = chrono::Utc::now() - chrono::Duration::days(1);
//!     let recent = client
//!         .transactions()
//!         .list(TransactionsQuery::since_time(yesterday).with_budget_id("ctx_123"))
//!         .await?;
//!
//!     // Un-assign everything from the last day
//!     for txn in &recent {
//!         client
//!             .transactions()
//!             .assign_to_bucket(&txn.id, FREE_TO_SPEND, None)
//!             .await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Debug Logging
//!
//! With `debug` enabled the client reports token refreshes, requests,
//! pages and filter decisions through `tracing` under the `dasbudget`
//! target. Any [`Observer`](observer::Observer) can be installed instead
//! via [`DasBudgetClient::with_observer`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod observer;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result, TransportError};
pub use models::{
    BucketId, BucketTarget, BudgetId, ItemId, TenantContext, TransactionId, FREE_TO_SPEND,
};
pub use client::{ClientConfig, ClientIdentity, DasBudgetClient, Endpoints};
pub use api::{RefreshOptions, TransactionsQuery};
pub use auth::TokenManager;

/// Prelude module for convenient imports.
///
/// ```rust
/// use dasbudget_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        BucketId, BucketTarget, BudgetId, ItemId, TenantContext, TransactionId, FREE_TO_SPEND,
        // Enums
        AccountKind, BucketKind,
        // Records
        Account, AccountItem, Bucket, Budget, Category, ItemRefresh, RefreshesSummary,
        Transaction,
    };
    pub use crate::client::{ClientConfig, DasBudgetClient, Endpoints};
    pub use crate::api::{RefreshOptions, TransactionsQuery};
    pub use crate::observer::{LifecycleEvent, Observer};
}
