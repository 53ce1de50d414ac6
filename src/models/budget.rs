//! Budget (context) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::BudgetId;

/// Budget summary as embedded in other resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Budget id
    pub id: BudgetId,
    /// Display name
    pub name: String,
    /// Normalized name
    #[serde(default)]
    pub name_clean: Option<String>,
    /// Owning user
    #[serde(default)]
    pub user_id: Option<String>,
    /// Photo
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Subscription covering the budget
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A budget the user owns or was invited to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget id
    pub id: BudgetId,
    /// Display name
    pub name: String,
    /// Normalized name
    #[serde(default)]
    pub name_clean: Option<String>,
    /// Owning user
    #[serde(default)]
    pub user_id: Option<String>,
    /// Photo
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Subscription covering the budget
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Members sharing the budget
    #[serde(default)]
    pub members: Vec<serde_json::Value>,
    /// Whether an invitation is still pending
    #[serde(default)]
    pub invite_pending: bool,
    /// Whether the current user owns the budget
    #[serde(default)]
    pub is_owner: bool,
    /// Server-computed summary figures
    #[serde(default)]
    pub context_summary: Option<serde_json::Value>,
}
