//! Transaction models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::account::Account;
use super::bucket::{Bucket, Category};
use super::primitives::{BucketId, TransactionId};

/// A bank transaction as returned by the transaction listing.
///
/// Only `id` and `created_at` are required; every other field the server
/// sends is kept, either in a typed field or in [`extra`](Self::extra), so
/// that a transaction can be sent back unchanged on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id
    pub id: TransactionId,
    /// When the server first recorded the transaction
    pub created_at: DateTime<Utc>,
    /// Last modification time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// User notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Owning user
    #[serde(default)]
    pub user_id: Option<String>,
    /// Bucket the transaction is assigned to, if any
    #[serde(default)]
    pub bucket_id: Option<BucketId>,
    /// Account the transaction belongs to
    #[serde(default)]
    pub account_id: Option<String>,
    /// Category id
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Signed amount
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Whether the transaction is still pending
    #[serde(default)]
    pub pending: bool,
    /// Date the transaction posted (`YYYY-MM-DD`)
    #[serde(default)]
    pub posted_date: Option<String>,
    /// Date the transaction was authorized
    #[serde(default)]
    pub authorized_date: Option<String>,
    /// Raw provider data
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<TransactionData>,
    /// Id of the pending transaction this one replaced
    #[serde(default)]
    pub pending_transaction_id: Option<String>,
    /// Removal time
    #[serde(default)]
    pub removed_at: Option<DateTime<Utc>>,
    /// Round-up amount
    #[serde(default)]
    pub rounded: Option<Decimal>,
    /// Budget the transaction belongs to
    #[serde(default)]
    pub context_id: Option<String>,
    /// Hidden time
    #[serde(default)]
    pub hidden_at: Option<DateTime<Utc>>,
    /// Merchant logo
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Manual amount adjustment
    #[serde(default)]
    pub amount_adjustment: Option<Decimal>,
    /// Name before any user rename
    #[serde(default)]
    pub original_name: Option<String>,
    /// Expanded bucket
    #[serde(default, deserialize_with = "lenient")]
    pub bucket: Option<Box<Bucket>>,
    /// Expanded category
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<Category>,
    /// Expanded account
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<Box<Account>>,
    /// Bucket spending snapshot
    #[serde(default, deserialize_with = "lenient")]
    pub bucket_spending: Option<BucketSpending>,
    /// Merchant metadata
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<TransactionMetadata>,
    /// Fields this crate does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
    /// Creation time as fractional seconds since the Unix epoch.
    pub fn created_at_secs(&self) -> f64 {
        self.created_at.timestamp_millis() as f64 / 1000.0
    }

    /// Returns `true` if the transaction was created at or after `since`
    /// (seconds since the Unix epoch).
    pub fn created_on_or_after(&self, since: f64) -> bool {
        self.created_at_secs() >= since
    }

    /// Merchant name, if the provider resolved one.
    pub fn merchant_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.merchant_name.as_deref())
    }

    /// Raw statement name from the provider.
    pub fn raw_name(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.raw_name.as_deref())
    }
}

/// Raw provider data attached to a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionData {
    /// Provider display name
    #[serde(default)]
    pub name: Option<String>,
    /// Statement name
    #[serde(default)]
    pub raw_name: Option<String>,
}

/// Merchant metadata attached to a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionMetadata {
    /// Statement name
    #[serde(default)]
    pub raw_name: Option<String>,
    /// Cleaned-up name
    #[serde(default)]
    pub nice_name: Option<String>,
    /// Resolved merchant
    #[serde(default)]
    pub merchant_name: Option<String>,
}

/// How a transaction affected its bucket and free-to-spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSpending {
    /// Free-to-spend after the transaction
    #[serde(default)]
    pub free_to_spend: Option<Decimal>,
    /// Activity in the bucket
    #[serde(default)]
    pub bucket_activity: Option<Decimal>,
    /// Bucket name
    #[serde(default)]
    pub bucket_name: Option<String>,
}

/// Decode an expanded record, or `None` if it does not match the model.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// One page of the transaction listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPage {
    /// Transactions on this page, in server order
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Total number of transactions across all pages
    #[serde(default)]
    pub total: Option<u64>,
    /// Page number echoed by the server
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size echoed by the server
    #[serde(default)]
    pub limit: Option<u32>,
}
