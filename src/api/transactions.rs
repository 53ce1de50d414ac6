//! Transactions service: listing, bucket assignment and notes.

use std::sync::Arc;

use crate::client::paginated::validate_cutoff;
use crate::client::ClientInner;
use crate::models::{BucketTarget, BudgetId, Transaction, TransactionId};
use crate::Result;

use super::path_segment;

/// Service for transaction operations.
///
/// # Example
///
/// ```no_run
/// use dasbudget_rs::{TransactionsQuery, FREE_TO_SPEND};
///
/// # async fn example(client: dasbudget_rs::DasBudgetClient) -> dasbudget_rs::Result<()> {
/// // Newest page only
/// let latest = client.transactions().list(TransactionsQuery::new()).await?;
///
/// // Move the newest one back to free-to-spend
/// if let Some(txn) = latest.first() {
///     client
///         .transactions()
///         .assign_to_bucket(&txn.id, FREE_TO_SPEND, None)
///         .await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct TransactionsService {
    inner: Arc<ClientInner>,
}

/// Options for listing transactions.
///
/// Without a cutoff only the newest page is returned. With a cutoff every
/// transaction created at or after it is collected across pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionsQuery {
    /// Cutoff in seconds since the Unix epoch (fractions allowed)
    pub since: Option<f64>,
    /// Budget to list from instead of the client default
    pub budget_id: Option<BudgetId>,
}

impl TransactionsQuery {
    /// Newest page of the default budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything created at or after `since` (seconds since the epoch).
    pub fn since(since: f64) -> Self {
        Self {
            since: Some(since),
            budget_id: None,
        }
    }

    /// Same as [`since`](Self::since), taking a timestamp.
    pub fn since_time(since: chrono::DateTime<chrono::Utc>) -> Self {
        Self::since(since.timestamp_millis() as f64 / 1000.0)
    }

    /// List from the given budget.
    pub fn with_budget_id(mut self, budget_id: impl Into<BudgetId>) -> Self {
        self.budget_id = Some(budget_id.into());
        self
    }
}

impl TransactionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List transactions.
    ///
    /// Transactions come back in server order (newest first). With a
    /// cutoff the pages are walked one at a time until a page yields
    /// nothing new; if any page fails the whole call fails and nothing
    /// collected so far is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the
    ///   cutoff is NaN or infinite. No request is sent in that case.
    /// - [`Error::Authentication`](crate::Error::Authentication) if the
    ///   access token cannot be refreshed.
    /// - [`Error::Fetch`](crate::Error::Fetch) if any page fails.
    pub async fn list(&self, query: TransactionsQuery) -> Result<Vec<Transaction>> {
        let budget = query.budget_id.as_ref();
        match query.since {
            None => self.inner.first_transaction_page(budget).await,
            Some(since) => {
                let since = validate_cutoff(since)?;
                self.inner.transactions_since(since, budget).await
            }
        }
    }

    /// Assign a transaction to a bucket, or back to free-to-spend.
    ///
    /// `target` accepts a [`BucketId`](crate::BucketId), a plain string or
    /// the [`FREE_TO_SPEND`](crate::FREE_TO_SPEND) sentinel. Returns the
    /// updated transaction.
    pub async fn assign_to_bucket(
        &self,
        transaction_id: &TransactionId,
        target: impl Into<BucketTarget>,
        budget_id: Option<&BudgetId>,
    ) -> Result<Transaction> {
        let target = target.into();
        let path = format!(
            "/api/item/swap/{}/{}",
            path_segment("transaction id", transaction_id.as_str())?,
            path_segment("bucket id", target.path_segment())?
        );

        tracing::debug!(transaction_id = %transaction_id, %target, "Assigning transaction");
        self.inner
            .post(&path, &serde_json::json!({}), budget_id)
            .await
    }

    /// Replace the notes of a transaction.
    ///
    /// The server expects the full record back, so the transaction as
    /// previously fetched is sent with only its notes changed. The
    /// category and name are not remembered for future transactions.
    pub async fn update_note(
        &self,
        transaction: &Transaction,
        note: impl Into<String>,
        budget_id: Option<&BudgetId>,
    ) -> Result<Transaction> {
        let mut updated = transaction.clone();
        updated.notes = Some(note.into());

        let path = format!(
            "/api/transaction/{}",
            path_segment("transaction id", transaction.id.as_str())?
        );
        let query = [
            ("remember_category", "false".to_string()),
            ("remember_name", "false".to_string()),
        ];

        self.inner.put(&path, &query, &updated, budget_id).await
    }
}
