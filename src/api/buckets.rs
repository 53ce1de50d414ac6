//! Buckets service: expenses, goals and vaults.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Bucket, BucketKind, BudgetId};
use crate::Result;

/// Buckets are listed in one request of up to this many.
const BUCKET_LIMIT: u32 = 1000;

/// Service for bucket listings.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: dasbudget_rs::DasBudgetClient) -> dasbudget_rs::Result<()> {
/// for bucket in client.buckets().expenses(None).await? {
///     println!("{}: {:?} left", bucket.name, bucket.remaining());
/// }
/// # Ok(())
/// # }
/// ```
pub struct BucketsService {
    inner: Arc<ClientInner>,
}

impl BucketsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all buckets of one kind, sorted by schedule date then name.
    pub async fn by_kind(
        &self,
        kind: BucketKind,
        budget_id: Option<&BudgetId>,
    ) -> Result<Vec<Bucket>> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(default)]
            items: Vec<Bucket>,
        }

        let query = [
            ("page", "1".to_string()),
            ("limit", BUCKET_LIMIT.to_string()),
            ("kind", kind.as_str().to_string()),
            ("sort", "schedule_date,name_clean".to_string()),
        ];
        let response: Response = self.inner.get("/api/bucket", &query, budget_id).await?;
        Ok(response.items)
    }

    /// List expense buckets.
    pub async fn expenses(&self, budget_id: Option<&BudgetId>) -> Result<Vec<Bucket>> {
        self.by_kind(BucketKind::Expense, budget_id).await
    }

    /// List goal buckets.
    pub async fn goals(&self, budget_id: Option<&BudgetId>) -> Result<Vec<Bucket>> {
        self.by_kind(BucketKind::Goal, budget_id).await
    }

    /// List vaults.
    pub async fn vaults(&self, budget_id: Option<&BudgetId>) -> Result<Vec<Bucket>> {
        self.by_kind(BucketKind::Vault, budget_id).await
    }
}
