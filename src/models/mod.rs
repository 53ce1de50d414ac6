//! Data models for the Das Budget API.
//!
//! Models are organized by domain:
//!
//! - [`primitives`] - Id newtypes, bucket targets and the tenant context
//! - [`enums`] - Bucket and account kinds
//! - [`transaction`] - Transactions and the transaction page
//! - [`bucket`] - Expenses, goals, vaults and their schedules
//! - [`account`] - Bank accounts, linked items and refresh credits
//! - [`budget`] - Budgets (server-side "contexts")

pub mod primitives;
pub mod enums;
pub mod transaction;
pub mod bucket;
pub mod account;
pub mod budget;

// Re-export commonly used types
pub use primitives::*;
pub use enums::*;
pub use transaction::*;
pub use bucket::*;
pub use account::*;
pub use budget::*;
