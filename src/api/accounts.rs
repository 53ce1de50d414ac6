//! Accounts service for synced bank accounts.

use std::sync::Arc;

use crate::client::paginated::ACCOUNT_TYPES;
use crate::client::ClientInner;
use crate::models::{Account, BudgetId};
use crate::Result;

/// Service for account-related operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: dasbudget_rs::DasBudgetClient) -> dasbudget_rs::Result<()> {
/// let accounts = client.accounts().list(None).await?;
/// for account in accounts {
///     println!("{} ({:?}): {:?}", account.name, account.kind, account.current_balance);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List checking and credit card accounts.
    pub async fn list(&self, budget_id: Option<&BudgetId>) -> Result<Vec<Account>> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(default)]
            items: Vec<Account>,
        }

        let query = [("types", ACCOUNT_TYPES.to_string())];
        let response: Response = self
            .inner
            .get("/api/item/account", &query, budget_id)
            .await?;
        Ok(response.items)
    }
}
