//! Lifecycle hooks for request tracing.
//!
//! The client reports what it is doing through an [`Observer`] instead of
//! printing. Pass any `Fn(&LifecycleEvent)` closure to record events in
//! tests, or enable [`ClientConfig::debug`](crate::ClientConfig) to get a
//! [`TracingObserver`] that forwards every event to `tracing`.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use dasbudget_rs::observer::{LifecycleEvent, Observer};
//!
//! let pages = Arc::new(Mutex::new(Vec::new()));
//! let sink = pages.clone();
//! let observer = move |event: &LifecycleEvent<'_>| {
//!     if let LifecycleEvent::PageFetched { page, .. } = event {
//!         sink.lock().unwrap().push(*page);
//!     }
//! };
//! observer.observe(&LifecycleEvent::PageFetched { page: 1, fetched: 40, total: None });
//! assert_eq!(*pages.lock().unwrap(), vec![1]);
//! ```

use chrono::{DateTime, Utc};
use reqwest::Method;

use crate::models::TenantContext;

/// Something the client did or is about to do.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent<'a> {
    /// A token exchange is about to be sent.
    TokenRefreshStarted,
    /// A token exchange succeeded.
    TokenRefreshed {
        /// New expiry of the access token
        expires_at: DateTime<Utc>,
    },
    /// A token exchange failed; the previous credential is kept.
    TokenRefreshFailed {
        /// Rendered error
        reason: String,
    },
    /// A resource request is about to be sent.
    Request {
        /// HTTP method
        method: &'a Method,
        /// Path below the API base
        path: &'a str,
        /// Budget the request applies to
        context: &'a TenantContext,
    },
    /// A resource response arrived.
    Response {
        /// HTTP method
        method: &'a Method,
        /// Path below the API base
        path: &'a str,
        /// HTTP status
        status: u16,
    },
    /// One page of the transaction listing was received.
    PageFetched {
        /// Page number, starting at 1
        page: u32,
        /// Number of transactions on the page
        fetched: usize,
        /// Total reported by the server
        total: Option<u64>,
    },
    /// A transaction was compared against the cutoff.
    FilterDecision {
        /// Transaction id
        transaction_id: &'a str,
        /// Creation time of the transaction
        created_at: DateTime<Utc>,
        /// Cutoff in seconds since the epoch
        since: f64,
        /// Whether the transaction was kept
        kept: bool,
    },
    /// The transaction listing finished.
    PaginationFinished {
        /// Pages requested
        pages: u32,
        /// Transactions returned to the caller
        returned: usize,
    },
}

/// Receives [`LifecycleEvent`]s from the client.
///
/// Observers are called inline on the request path and must not block.
pub trait Observer: Send + Sync {
    /// Called once per event.
    fn observe(&self, event: &LifecycleEvent<'_>);
}

impl<F> Observer for F
where
    F: Fn(&LifecycleEvent<'_>) + Send + Sync,
{
    fn observe(&self, event: &LifecycleEvent<'_>) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&self, _event: &LifecycleEvent<'_>) {}
}

/// Observer that logs every event at `debug` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(&self, event: &LifecycleEvent<'_>) {
        match event {
            LifecycleEvent::TokenRefreshStarted => {
                tracing::debug!(target: "dasbudget", "Refreshing access token");
            }
            LifecycleEvent::TokenRefreshed { expires_at } => {
                tracing::debug!(target: "dasbudget", %expires_at, "Access token refreshed");
            }
            LifecycleEvent::TokenRefreshFailed { reason } => {
                tracing::debug!(target: "dasbudget", %reason, "Access token refresh failed");
            }
            LifecycleEvent::Request {
                method,
                path,
                context,
            } => {
                tracing::debug!(target: "dasbudget", %method, path, %context, "Sending request");
            }
            LifecycleEvent::Response {
                method,
                path,
                status,
            } => {
                tracing::debug!(target: "dasbudget", %method, path, status, "Received response");
            }
            LifecycleEvent::PageFetched {
                page,
                fetched,
                total,
            } => {
                tracing::debug!(target: "dasbudget", page, fetched, ?total, "Fetched transaction page");
            }
            LifecycleEvent::FilterDecision {
                transaction_id,
                created_at,
                since,
                kept,
            } => {
                tracing::debug!(
                    target: "dasbudget",
                    transaction_id,
                    %created_at,
                    since,
                    kept,
                    "Compared transaction against cutoff"
                );
            }
            LifecycleEvent::PaginationFinished { pages, returned } => {
                tracing::debug!(target: "dasbudget", pages, returned, "Transaction listing finished");
            }
        }
    }
}
