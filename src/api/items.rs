//! Linked items service: institution logins and data refreshes.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::client::ClientInner;
use crate::models::{AccountItem, BudgetId, ItemId, RefreshesSummary};
use crate::Result;

use super::path_segment;

/// Service for linked institution items.
///
/// # Example
///
/// ```no_run
/// use dasbudget_rs::RefreshOptions;
///
/// # async fn example(client: dasbudget_rs::DasBudgetClient) -> dasbudget_rs::Result<()> {
/// let summary = client.items().refreshes(None).await?;
/// println!("{} refresh credits left", summary.refresh_balance);
///
/// for item in summary.refreshable() {
///     client.items().refresh(RefreshOptions::new(item.id.clone())).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct ItemsService {
    inner: Arc<ClientInner>,
}

/// Options for triggering an item refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Item to refresh
    pub item_id: ItemId,
    /// Spend a premium refresh credit
    pub use_premium: bool,
    /// Budget the item belongs to, if not the client default
    pub budget_id: Option<BudgetId>,
}

impl RefreshOptions {
    /// Refresh `item_id` with a regular credit.
    pub fn new(item_id: impl Into<ItemId>) -> Self {
        Self {
            item_id: item_id.into(),
            use_premium: false,
            budget_id: None,
        }
    }

    /// Use a premium credit.
    pub fn premium(mut self, use_premium: bool) -> Self {
        self.use_premium = use_premium;
        self
    }

    /// Send the refresh in the given budget.
    pub fn with_budget_id(mut self, budget_id: impl Into<BudgetId>) -> Self {
        self.budget_id = Some(budget_id.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest {
    use_premium: bool,
    idempotency_key: Uuid,
    user_initiated: bool,
}

impl ItemsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List linked items in the current budget.
    pub async fn list(&self, budget_id: Option<&BudgetId>) -> Result<Vec<AccountItem>> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(default)]
            items: Vec<AccountItem>,
        }

        let response: Response = self.inner.get("/api/item", &[], budget_id).await?;
        Ok(response.items)
    }

    /// Get refresh credits and which items can be refreshed.
    pub async fn refreshes(&self, budget_id: Option<&BudgetId>) -> Result<RefreshesSummary> {
        self.inner.get("/api/item/refreshes", &[], budget_id).await
    }

    /// Ask the server to pull fresh data from the institution.
    ///
    /// Every call carries a new idempotency key, so two calls are two
    /// refreshes. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument)
    /// without sending anything if the item id is empty or not a single
    /// path segment.
    pub async fn refresh(&self, options: RefreshOptions) -> Result<()> {
        let path = format!(
            "/api/item/{}/refresh",
            path_segment("item id", options.item_id.as_str())?
        );
        let body = RefreshRequest {
            use_premium: options.use_premium,
            idempotency_key: Uuid::new_v4(),
            user_initiated: true,
        };

        tracing::debug!(
            item_id = %options.item_id,
            use_premium = options.use_premium,
            idempotency_key = %body.idempotency_key,
            "Requesting item refresh"
        );
        self.inner
            .post_raw(&path, &body, options.budget_id.as_ref())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_options() {
        let options = RefreshOptions::new("item_1").premium(true).with_budget_id("ctx_1");
        assert_eq!(options.item_id, ItemId::new("item_1"));
        assert!(options.use_premium);
        assert_eq!(options.budget_id, Some(BudgetId::new("ctx_1")));
        assert!(!RefreshOptions::new("item_1").use_premium);
    }

    #[test]
    fn test_refresh_request_body() {
        let body = RefreshRequest {
            use_premium: false,
            idempotency_key: Uuid::nil(),
            user_initiated: true,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "use_premium": false,
                "idempotency_key": "00000000-0000-0000-0000-000000000000",
                "user_initiated": true,
            })
        );
    }
}
