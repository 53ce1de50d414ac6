//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// Identifier of a budget (the server calls it a "context").
    ///
    /// # Example
    ///
    /// ```
    /// use dasbudget_rs::BudgetId;
    ///
    /// let budget = BudgetId::new("ctx_123");
    /// assert_eq!(budget.as_str(), "ctx_123");
    /// ```
    BudgetId
}

string_id! {
    /// Identifier of a transaction.
    TransactionId
}

string_id! {
    /// Identifier of a bucket (expense, goal or vault).
    BucketId
}

string_id! {
    /// Identifier of a linked institution item.
    ItemId
}

/// Reserved bucket id meaning "free to spend" rather than a real bucket.
pub const FREE_TO_SPEND: &str = "FREE_TO_SPEND";

/// Destination of a transaction-to-bucket assignment.
///
/// The free-to-spend pool is not a bucket on the server; it is addressed by
/// the literal path segment `fts`.
///
/// # Example
///
/// ```
/// use dasbudget_rs::{BucketTarget, FREE_TO_SPEND};
///
/// assert_eq!(BucketTarget::from(FREE_TO_SPEND).path_segment(), "fts");
/// assert_eq!(BucketTarget::from("bkt_42").path_segment(), "bkt_42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketTarget {
    /// A real bucket.
    Bucket(BucketId),
    /// The free-to-spend pool.
    FreeToSpend,
}

impl BucketTarget {
    /// The URL path segment addressing this target.
    pub fn path_segment(&self) -> &str {
        match self {
            BucketTarget::Bucket(id) => id.as_str(),
            BucketTarget::FreeToSpend => "fts",
        }
    }
}

impl From<BucketId> for BucketTarget {
    fn from(id: BucketId) -> Self {
        if id.as_str() == FREE_TO_SPEND {
            BucketTarget::FreeToSpend
        } else {
            BucketTarget::Bucket(id)
        }
    }
}

impl From<&str> for BucketTarget {
    fn from(s: &str) -> Self {
        BucketId::from(s).into()
    }
}

impl From<String> for BucketTarget {
    fn from(s: String) -> Self {
        BucketId::from(s).into()
    }
}

impl fmt::Display for BucketTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketTarget::Bucket(id) => write!(f, "{}", id),
            BucketTarget::FreeToSpend => write!(f, "{}", FREE_TO_SPEND),
        }
    }
}

/// Budget selection sent with every authenticated request.
///
/// Without an explicit budget the server falls back to the user's oldest
/// budget; that case is encoded as the literal header value `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TenantContext {
    /// Let the server pick the default budget.
    #[default]
    None,
    /// Operate on a specific budget.
    Budget(BudgetId),
}

impl TenantContext {
    /// Header value for this context.
    pub fn header_value(&self) -> &str {
        match self {
            TenantContext::None => "null",
            TenantContext::Budget(id) => id.as_str(),
        }
    }

    /// The selected budget, if any.
    pub fn budget_id(&self) -> Option<&BudgetId> {
        match self {
            TenantContext::None => None,
            TenantContext::Budget(id) => Some(id),
        }
    }
}

impl From<Option<BudgetId>> for TenantContext {
    fn from(id: Option<BudgetId>) -> Self {
        id.map_or(TenantContext::None, TenantContext::Budget)
    }
}

impl fmt::Display for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_id() {
        let budget = BudgetId::new("ctx_1");
        assert_eq!(budget.as_str(), "ctx_1");
        assert_eq!(budget.to_string(), "ctx_1");
    }

    #[test]
    fn test_free_to_spend_maps_to_fts() {
        assert_eq!(BucketTarget::from(FREE_TO_SPEND), BucketTarget::FreeToSpend);
        assert_eq!(BucketTarget::FreeToSpend.path_segment(), "fts");
        assert_eq!(
            BucketTarget::from(BucketId::new(FREE_TO_SPEND)).path_segment(),
            "fts"
        );
    }

    #[test]
    fn test_regular_bucket_passes_through() {
        let target: BucketTarget = "bkt_9".into();
        assert_eq!(target, BucketTarget::Bucket(BucketId::new("bkt_9")));
        assert_eq!(target.path_segment(), "bkt_9");
        // Only the exact sentinel is special.
        assert_eq!(BucketTarget::from("free_to_spend").path_segment(), "free_to_spend");
    }

    #[test]
    fn test_tenant_context_header_value() {
        assert_eq!(TenantContext::None.header_value(), "null");
        assert_eq!(
            TenantContext::from(Some(BudgetId::new("ctx_7"))).header_value(),
            "ctx_7"
        );
        assert_eq!(TenantContext::from(None), TenantContext::None);
    }
}
