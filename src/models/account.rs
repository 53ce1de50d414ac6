//! Bank accounts, linked institution items and refresh credits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::budget::BudgetSummary;
use super::enums::AccountKind;
use super::primitives::ItemId;

/// A bank account synced from a linked institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account id
    pub id: String,
    /// Display name
    pub name: String,
    /// Name reported by the institution
    #[serde(default)]
    pub official_name: Option<String>,
    /// Account type
    #[serde(default, rename = "type")]
    pub kind: AccountKind,
    /// Last four digits
    #[serde(default)]
    pub mask: Option<String>,
    /// Available balance
    #[serde(default)]
    pub available_balance: Option<Decimal>,
    /// Current (ledger) balance
    #[serde(default)]
    pub current_balance: Option<Decimal>,
    /// Credit limit
    #[serde(default)]
    pub limit_balance: Option<Decimal>,
    /// Whether the account is active
    #[serde(default)]
    pub active: bool,
    /// Whether balances count towards free-to-spend
    #[serde(default)]
    pub spendable: bool,
    /// Whether the current user owns the account
    #[serde(default)]
    pub is_owner: bool,
    /// Whether the account is covered by the subscription
    #[serde(default)]
    pub enabled_for_sub: bool,
    /// Linked item id
    #[serde(default)]
    pub item_id: Option<ItemId>,
    /// Budget the account belongs to
    #[serde(default)]
    pub context_id: Option<String>,
    /// Last sync time
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// Removal time
    #[serde(default)]
    pub removed_at: Option<DateTime<Utc>>,
    /// Expanded linked item
    #[serde(default)]
    pub item: Option<Box<AccountItem>>,
    /// Expanded budget
    #[serde(default)]
    pub context: Option<BudgetSummary>,
}

/// A linked institution login (the server calls it an "item").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountItem {
    /// Item id
    pub id: ItemId,
    /// Institution id
    #[serde(default)]
    pub institution_id: Option<String>,
    /// Institution display name
    #[serde(default)]
    pub institution_name: Option<String>,
    /// Institution logo
    #[serde(default)]
    pub institution_logo: Option<String>,
    /// Institution brand color
    #[serde(default)]
    pub institution_color: Option<String>,
    /// Aggregation provider
    #[serde(default)]
    pub provider: Option<String>,
    /// Whether a sync is in progress
    #[serde(default)]
    pub syncing: bool,
    /// Whether the user must re-authenticate with the institution
    #[serde(default)]
    pub needs_action: bool,
    /// Whether a manual refresh is currently allowed
    #[serde(default)]
    pub can_refresh: bool,
    /// Whether the connection can be reconfigured
    #[serde(default)]
    pub can_reconfigure: bool,
    /// Whether the current user owns the item
    #[serde(default)]
    pub is_owner: bool,
    /// Budget the item belongs to
    #[serde(default)]
    pub context_id: Option<String>,
    /// Last sync attempt
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// Last successful sync
    #[serde(default)]
    pub last_successful_sync: Option<DateTime<Utc>>,
    /// Last failed sync
    #[serde(default)]
    pub last_failed_sync: Option<DateTime<Utc>>,
    /// Archive time
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    /// Accounts under this item
    #[serde(default)]
    pub accounts: Option<Vec<Account>>,
    /// Provider-specific institution status
    #[serde(default)]
    pub institution_status: Option<serde_json::Value>,
    /// Provider-specific item status
    #[serde(default)]
    pub item_status: Option<serde_json::Value>,
}

/// Refresh credits and per-item refresh availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshesSummary {
    /// Window for premium refresh credits, in days
    #[serde(default)]
    pub premium_rolling_days: i64,
    /// Premium credits available in the window
    #[serde(default)]
    pub premium_rolling_credits: i64,
    /// Whether premium refreshes are available
    #[serde(default)]
    pub has_premium_refreshes: bool,
    /// Upsell message
    #[serde(default)]
    pub premium_upsell: Option<String>,
    /// When the next credits become available
    #[serde(default)]
    pub next_credits: Vec<String>,
    /// Credit balance
    #[serde(default)]
    pub credit_balance: i64,
    /// Refresh balance
    #[serde(default)]
    pub refresh_balance: i64,
    /// Whether the user may manage refreshes
    #[serde(default)]
    pub can_manage_refreshes: bool,
    /// Per-item refresh information
    #[serde(default)]
    pub item_refreshes: Vec<ItemRefresh>,
}

impl RefreshesSummary {
    /// Items that can be refreshed right now.
    pub fn refreshable(&self) -> impl Iterator<Item = &ItemRefresh> {
        self.item_refreshes.iter().filter(|item| item.can_refresh)
    }
}

/// Refresh availability for one linked item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRefresh {
    /// Item id
    pub id: ItemId,
    /// Institution display name
    #[serde(default)]
    pub institution_name: Option<String>,
    /// Institution logo
    #[serde(default)]
    pub institution_logo: Option<String>,
    /// Credits a refresh costs
    #[serde(default)]
    pub refresh_cost: i64,
    /// Whether a refresh is allowed now
    #[serde(default)]
    pub can_refresh: bool,
    /// Last provider-side sync
    #[serde(default)]
    pub last_provider_sync: Option<String>,
    /// Last service-side sync
    #[serde(default)]
    pub last_das_sync: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_account() {
        let json = r#"{
            "id": "acc_1",
            "name": "Everyday",
            "type": "checking",
            "mask": "1234",
            "available_balance": "812.40",
            "current_balance": "850.00",
            "active": true,
            "spendable": true,
            "item": { "id": "itm_1", "institution_name": "First Bank", "can_refresh": true }
        }"#;

        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.kind, AccountKind::Checking);
        assert!(account.spendable);
        assert_eq!(account.item.unwrap().id.as_str(), "itm_1");
    }

    #[test]
    fn test_refreshable_items() {
        let json = r#"{
            "credit_balance": 2,
            "item_refreshes": [
                { "id": "itm_1", "refresh_cost": 1, "can_refresh": true },
                { "id": "itm_2", "refresh_cost": 1, "can_refresh": false }
            ]
        }"#;

        let summary: RefreshesSummary = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = summary.refreshable().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["itm_1"]);
    }
}
