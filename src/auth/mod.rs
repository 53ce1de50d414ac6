//! Authentication against the identity backend.
//!
//! The service authenticates with short-lived bearer tokens issued by a
//! token endpoint in exchange for a long-lived refresh secret and an API
//! key. The [`TokenManager`] owns that exchange and keeps the token fresh:
//! every request first calls [`TokenManager::ensure_valid`], which refreshes
//! the token once it is within five minutes of expiring.
//!
//! ```no_run
//! use dasbudget_rs::{ClientConfig, DasBudgetClient};
//!
//! # async fn example() -> dasbudget_rs::Result<()> {
//! let client = DasBudgetClient::new(ClientConfig::new("refresh-token", "api-key"))?;
//! client.initialize().await?;
//!
//! let tokens = client.tokens();
//! println!("token valid until {:?}", tokens.expires_at().await);
//! # Ok(())
//! # }
//! ```

mod token;

pub use token::TokenManager;
