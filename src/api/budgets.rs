//! Budgets service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::Budget;
use crate::Result;

/// Service for listing the budgets the user can access.
///
/// The server calls budgets "contexts"; the id of one is what
/// [`DasBudgetClient::set_budget_id`](crate::DasBudgetClient::set_budget_id)
/// expects.
pub struct BudgetsService {
    inner: Arc<ClientInner>,
}

impl BudgetsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all budgets.
    pub async fn list(&self) -> Result<Vec<Budget>> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(default)]
            items: Vec<Budget>,
        }

        let response: Response = self.inner.get("/api/context", &[], None).await?;
        Ok(response.items)
    }
}
