//! API service modules for Das Budget endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the Das Budget API.

mod accounts;
mod buckets;
mod budgets;
mod items;
mod transactions;

pub use accounts::AccountsService;
pub use buckets::BucketsService;
pub use budgets::BudgetsService;
pub use items::{ItemsService, RefreshOptions};
pub use transactions::{TransactionsQuery, TransactionsService};

use crate::{Error, Result};

/// Check that an id can be placed in a URL path as a single segment.
fn path_segment<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be empty", what)));
    }
    if value
        .chars()
        .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace() || c.is_control())
    {
        return Err(Error::InvalidArgument(format!(
            "{} is not a valid path segment: {:?}",
            what, value
        )));
    }
    Ok(value)
}
