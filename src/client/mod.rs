//! HTTP client and service layer for the Das Budget API.
//!
//! This module provides the main entry point [`DasBudgetClient`] for
//! interacting with the Das Budget API, and the [`HttpTransport`] seam it
//! sends requests through.
//!
//! # Example
//!
//! ```no_run
//! use dasbudget_rs::{ClientConfig, DasBudgetClient};
//!
//! # async fn example() -> dasbudget_rs::Result<()> {
//! let config = ClientConfig::new("refresh-token", "api-key").with_budget_id("ctx_123");
//! let client = DasBudgetClient::new(config)?;
//!
//! // Get accounts
//! let accounts = client.accounts().list(None).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
pub mod transport;

pub use config::{ClientConfig, ClientIdentity, Endpoints};
pub use http::DasBudgetClient;
pub use paginated::{PageOutcome, PAGE_SIZE};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub(crate) use http::ClientInner;
