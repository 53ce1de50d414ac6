//! Bucket models: expenses, goals and vaults, plus their schedules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::BucketKind;
use super::primitives::BucketId;
use super::transaction::Transaction;

/// An expense, goal or vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    /// Unique bucket id
    pub id: BucketId,
    /// Bucket kind
    pub kind: BucketKind,
    /// Display name
    pub name: String,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Owning user
    #[serde(default)]
    pub user_id: Option<String>,
    /// User notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Amount the bucket is working towards
    #[serde(default)]
    pub target_amount: Option<Decimal>,
    /// Amount currently set aside
    #[serde(default)]
    pub current_amount: Option<Decimal>,
    /// Recurrence rule (RRULE)
    #[serde(default)]
    pub schedule: Option<String>,
    /// Human-readable schedule
    #[serde(default)]
    pub schedule_desc: Option<String>,
    /// Date the schedule is anchored to
    #[serde(default)]
    pub schedule_date: Option<String>,
    /// Next due date
    #[serde(default)]
    pub schedule_next_date: Option<String>,
    /// Schedule timezone
    #[serde(default)]
    pub schedule_timezone: Option<String>,
    /// Next contribution per funding event
    #[serde(default)]
    pub contribution: Option<Decimal>,
    /// Next scheduled contribution
    #[serde(default)]
    pub next_contribution: Option<Decimal>,
    /// Normalized name used for sorting
    #[serde(default)]
    pub name_clean: Option<String>,
    /// Merchants matched into this bucket
    #[serde(default)]
    pub merchants: Option<Vec<String>>,
    /// Whether funding is paused
    #[serde(default)]
    pub paused: bool,
    /// Whether the bucket is behind its schedule
    #[serde(default)]
    pub off_track: bool,
    /// Whether partial spending is allowed
    #[serde(default)]
    pub partial_spend: bool,
    /// Display color
    #[serde(default)]
    pub color: Option<String>,
    /// Budget the bucket belongs to
    #[serde(default)]
    pub context_id: Option<String>,
    /// Removal time
    #[serde(default)]
    pub removed_at: Option<DateTime<Utc>>,
    /// Group this bucket is shown in
    #[serde(default)]
    pub bucket_group_id: Option<String>,
    /// Recurrence id
    #[serde(default)]
    pub recurrence_id: Option<String>,
    /// Funding schedule id
    #[serde(default)]
    pub funding_schedule_id: Option<String>,
    /// Categories matched into this bucket
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Expanded funding schedule
    #[serde(default)]
    pub funding_schedule: Option<FundingSchedule>,
    /// Expanded recurrence
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    /// Expanded group
    #[serde(default)]
    pub bucket_group: Option<BucketGroup>,
    /// Transactions assigned to the bucket, when expanded
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
}

impl Bucket {
    /// Amount still missing to reach the target, never negative.
    pub fn remaining(&self) -> Option<Decimal> {
        match (self.target_amount, self.current_amount) {
            (Some(target), Some(current)) => Some((target - current).max(Decimal::ZERO)),
            _ => None,
        }
    }
}

/// Spending category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    pub id: i64,
    /// Category name
    pub name: String,
    /// Emoji shown next to the name
    #[serde(default)]
    pub emoji: Option<String>,
    /// Parent folder id
    #[serde(default)]
    pub folder_id: Option<i64>,
    /// Parent folder name
    #[serde(default)]
    pub folder_name: Option<String>,
    /// Expanded parent folder
    #[serde(default)]
    pub folder: Option<CategoryFolder>,
}

/// Folder grouping several categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFolder {
    /// Folder id
    pub id: i64,
    /// Folder name
    pub name: String,
}

/// When money is moved into buckets (usually paydays).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingSchedule {
    /// Schedule id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Recurrence rule (RRULE)
    #[serde(default)]
    pub schedule: Option<String>,
    /// Human-readable schedule
    #[serde(default)]
    pub schedule_desc: Option<String>,
    /// Anchor date
    #[serde(default)]
    pub schedule_date: Option<String>,
    /// Next funding date
    #[serde(default)]
    pub schedule_next_date: Option<String>,
    /// Last time the schedule ran
    #[serde(default)]
    pub last_executed: Option<String>,
    /// Schedule timezone
    #[serde(default)]
    pub schedule_timezone: Option<String>,
    /// Pause time
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    /// Bucket the schedule is tied to
    #[serde(default)]
    pub bucket_id: Option<BucketId>,
}

/// Contribution history of a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recurrence {
    /// Recurrence id
    pub id: String,
    /// Last funding date
    #[serde(default)]
    pub last_fund_date: Option<String>,
    /// Next funding date
    #[serde(default)]
    pub next_fund_date: Option<String>,
    /// Contributions that were skipped
    #[serde(default)]
    pub missed_contributions: i64,
    /// Contributions made so far
    #[serde(default)]
    pub total_contributions: i64,
    /// Sum of all contributions
    #[serde(default)]
    pub total_contribution_amount: Option<Decimal>,
}

/// Display group for buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketGroup {
    /// Group id
    pub id: String,
    /// Group name
    pub name: String,
    /// Emoji shown next to the name
    #[serde(default)]
    pub emoji: Option<String>,
    /// Kind of bucket the group holds
    #[serde(default)]
    pub kind: Option<BucketKind>,
    /// Display color
    #[serde(default)]
    pub color: Option<String>,
    /// Sort position
    #[serde(default)]
    pub position: i64,
    /// User notes
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_bucket() {
        let json = r#"{
            "id": "bkt_1",
            "kind": "goal",
            "name": "Vacation",
            "target_amount": "1500.00",
            "current_amount": "400.25",
            "paused": false,
            "off_track": true,
            "categories": [
                { "id": 3, "name": "Travel", "emoji": "x", "folder": { "id": 1, "name": "Fun" } }
            ]
        }"#;

        let bucket: Bucket = serde_json::from_str(json).unwrap();
        assert_eq!(bucket.kind, BucketKind::Goal);
        assert!(bucket.off_track);
        assert_eq!(bucket.categories[0].folder.as_ref().unwrap().name, "Fun");
        assert_eq!(bucket.remaining(), Some(dec!(1099.75)));
    }

    #[test]
    fn test_remaining_never_negative() {
        let json = r#"{
            "id": "bkt_2",
            "kind": "vault",
            "name": "Rainy day",
            "target_amount": "100",
            "current_amount": "250"
        }"#;
        let bucket: Bucket = serde_json::from_str(json).unwrap();
        assert_eq!(bucket.remaining(), Some(Decimal::ZERO));
    }
}
