//! Enumeration types for the Das Budget API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
    /// Recurring spending the user sets money aside for
    Expense,
    /// Savings target with an amount and date
    Goal,
    /// Open-ended savings pot
    Vault,
    /// A kind this crate does not know yet
    #[serde(other)]
    Unknown,
}

impl BucketKind {
    /// The value the server expects in the `kind` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKind::Expense => "expense",
            BucketKind::Goal => "goal",
            BucketKind::Vault => "vault",
            BucketKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of a bank account as reported by the aggregation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountKind {
    /// Checking account
    #[serde(rename = "checking")]
    Checking,
    /// Credit card account
    #[serde(rename = "credit card")]
    CreditCard,
    /// Savings account
    #[serde(rename = "savings")]
    Savings,
    /// Any other account type
    #[serde(other)]
    #[default]
    Other,
}

impl AccountKind {
    /// Returns `true` for the account types the budgeting views cover.
    pub fn is_spendable_type(&self) -> bool {
        matches!(self, AccountKind::Checking | AccountKind::CreditCard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_kind_serde() {
        assert_eq!(serde_json::to_string(&BucketKind::Goal).unwrap(), "\"goal\"");
        let kind: BucketKind = serde_json::from_str("\"vault\"").unwrap();
        assert_eq!(kind, BucketKind::Vault);
        assert_eq!(BucketKind::Expense.to_string(), "expense");

        let kind: BucketKind = serde_json::from_str("\"savings_pot\"").unwrap();
        assert_eq!(kind, BucketKind::Unknown);
    }

    #[test]
    fn test_account_kind_unknown_falls_back() {
        let kind: AccountKind = serde_json::from_str("\"credit card\"").unwrap();
        assert_eq!(kind, AccountKind::CreditCard);
        assert!(kind.is_spendable_type());

        let kind: AccountKind = serde_json::from_str("\"brokerage\"").unwrap();
        assert_eq!(kind, AccountKind::Other);
        assert!(!kind.is_spendable_type());
    }
}
