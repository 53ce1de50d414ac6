//! Page traversal for the transaction listing.
//!
//! The listing endpoint returns transactions in pages of [`PAGE_SIZE`],
//! newest first, without telling the client whether the next page can
//! still contain anything it cares about. Two modes are supported:
//!
//! - **First page only** (no cutoff): one request, returned unfiltered.
//! - **Since a cutoff**: pages are fetched one after another and filtered
//!   client-side to transactions created at or after the cutoff, until a
//!   page signals that nothing newer can follow (see [`PageOutcome`]).
//!
//! Pages are fetched strictly in sequence. Any failure aborts the whole
//! traversal and discards what was collected so far.

use reqwest::Method;

use super::http::ClientInner;
use crate::models::{BudgetId, Transaction, TransactionPage};
use crate::observer::LifecycleEvent;
use crate::{Error, Result};

/// Number of transactions requested per page.
pub const PAGE_SIZE: usize = 40;

/// Account types included in the listing.
pub(crate) const ACCOUNT_TYPES: &str = "checking,credit card";

const TRANSACTIONS_PATH: &str = "/api/transaction";

/// What to do after a page has been filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Request the next page.
    Continue,
    /// Stop; no further matches are expected.
    Exhausted,
}

impl PageOutcome {
    /// Decide whether to keep paging.
    ///
    /// Stops on an empty page, or on a short page (fewer than `page_size`
    /// items) where nothing passed the cutoff. A full page always
    /// continues, even with zero matches, and so does a short page with at
    /// least one match.
    pub fn decide(fetched: usize, matched: usize, page_size: usize) -> Self {
        if fetched == 0 || (fetched < page_size && matched == 0) {
            PageOutcome::Exhausted
        } else {
            PageOutcome::Continue
        }
    }
}

/// Traversal state for one cutoff-filtered listing.
#[derive(Debug)]
pub(crate) struct FetchCursor {
    since: f64,
    page: u32,
    accumulated: Vec<Transaction>,
    has_more: bool,
}

impl FetchCursor {
    pub(crate) fn new(since: f64) -> Self {
        Self {
            since,
            page: 1,
            accumulated: Vec::new(),
            has_more: true,
        }
    }

    /// Page to request next.
    pub(crate) fn page(&self) -> u32 {
        self.page
    }

    pub(crate) fn has_more(&self) -> bool {
        self.has_more
    }

    /// Filter one page into the result and advance.
    pub(crate) fn absorb(
        &mut self,
        transactions: Vec<Transaction>,
        mut on_decision: impl FnMut(&Transaction, bool),
    ) -> PageOutcome {
        let fetched = transactions.len();
        let before = self.accumulated.len();

        for txn in transactions {
            let kept = txn.created_on_or_after(self.since);
            on_decision(&txn, kept);
            if kept {
                self.accumulated.push(txn);
            }
        }

        let matched = self.accumulated.len() - before;
        let outcome = PageOutcome::decide(fetched, matched, PAGE_SIZE);
        match outcome {
            PageOutcome::Continue => self.page += 1,
            PageOutcome::Exhausted => self.has_more = false,
        }
        outcome
    }

    /// Pages requested so far.
    pub(crate) fn pages_fetched(&self) -> u32 {
        if self.has_more {
            self.page - 1
        } else {
            self.page
        }
    }

    pub(crate) fn into_transactions(self) -> Vec<Transaction> {
        self.accumulated
    }
}

/// Reject cutoffs that cannot be compared against timestamps.
pub(crate) fn validate_cutoff(since: f64) -> Result<f64> {
    if since.is_finite() {
        Ok(since)
    } else {
        Err(Error::InvalidArgument(format!(
            "since must be a finite number of seconds since the epoch, got {}",
            since
        )))
    }
}

impl ClientInner {
    /// Fetch one page of the listing.
    pub(crate) async fn transaction_page(
        &self,
        page: u32,
        budget: Option<&BudgetId>,
    ) -> Result<TransactionPage> {
        let query = [
            ("page", page.to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("types", ACCOUNT_TYPES.to_string()),
        ];
        let page_data: TransactionPage = self
            .send(Method::GET, TRANSACTIONS_PATH, &query, None, budget)
            .await?
            .decode()
            .map_err(Error::Fetch)?;

        self.observer.observe(&LifecycleEvent::PageFetched {
            page,
            fetched: page_data.transactions.len(),
            total: page_data.total,
        });
        Ok(page_data)
    }

    /// The first page, unfiltered.
    pub(crate) async fn first_transaction_page(
        &self,
        budget: Option<&BudgetId>,
    ) -> Result<Vec<Transaction>> {
        let page = self.transaction_page(1, budget).await?;
        let returned = page.transactions.len();
        self.observer.observe(&LifecycleEvent::PaginationFinished { pages: 1, returned });
        Ok(page.transactions)
    }

    /// Every transaction created at or after `since`, in server order.
    pub(crate) async fn transactions_since(
        &self,
        since: f64,
        budget: Option<&BudgetId>,
    ) -> Result<Vec<Transaction>> {
        let mut cursor = FetchCursor::new(since);

        while cursor.has_more() {
            let page_number = cursor.page();
            let page = self.transaction_page(page_number, budget).await?;
            let outcome = cursor.absorb(page.transactions, |txn, kept| {
                self.observer.observe(&LifecycleEvent::FilterDecision {
                    transaction_id: txn.id.as_str(),
                    created_at: txn.created_at,
                    since,
                    kept,
                });
            });
            tracing::trace!(page = page_number, ?outcome, "Processed transaction page");
        }

        let pages = cursor.pages_fetched();
        let transactions = cursor.into_transactions();
        self.observer.observe(&LifecycleEvent::PaginationFinished {
            pages,
            returned: transactions.len(),
        });
        tracing::debug!(pages, returned = transactions.len(), since, "Collected transactions");
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn txn(id: usize, created_secs: i64) -> Transaction {
        serde_json::from_value(serde_json::json!({
            "id": format!("txn_{}", id),
            "created_at": Utc.timestamp_opt(created_secs, 0).unwrap().to_rfc3339(),
        }))
        .unwrap()
    }

    fn page(count: usize, created_secs: i64) -> Vec<Transaction> {
        (0..count).map(|i| txn(i, created_secs)).collect()
    }

    #[test]
    fn test_decide_termination_rule() {
        // Empty page always stops.
        assert_eq!(PageOutcome::decide(0, 0, 40), PageOutcome::Exhausted);
        // Short page without matches stops.
        assert_eq!(PageOutcome::decide(5, 0, 40), PageOutcome::Exhausted);
        assert_eq!(PageOutcome::decide(39, 0, 40), PageOutcome::Exhausted);
        // Short page with a match continues.
        assert_eq!(PageOutcome::decide(5, 1, 40), PageOutcome::Continue);
        // Full page continues, with or without matches.
        assert_eq!(PageOutcome::decide(40, 40, 40), PageOutcome::Continue);
        assert_eq!(PageOutcome::decide(40, 0, 40), PageOutcome::Continue);
    }

    #[test]
    fn test_cursor_full_matching_page_advances() {
        let mut cursor = FetchCursor::new(1_700_000_000.0);
        let outcome = cursor.absorb(page(PAGE_SIZE, 1_700_000_100), |_, _| {});

        assert_eq!(outcome, PageOutcome::Continue);
        assert!(cursor.has_more());
        assert_eq!(cursor.page(), 2);
        assert_eq!(cursor.pages_fetched(), 1);
    }

    #[test]
    fn test_cursor_short_page_without_matches_stops() {
        let mut cursor = FetchCursor::new(4_000_000_000.0);
        let outcome = cursor.absorb(page(5, 1_700_000_000), |_, _| {});

        assert_eq!(outcome, PageOutcome::Exhausted);
        assert!(!cursor.has_more());
        assert_eq!(cursor.pages_fetched(), 1);
        assert!(cursor.into_transactions().is_empty());
    }

    #[test]
    fn test_cursor_filters_and_keeps_order() {
        let since = 1_700_000_000;
        let mut cursor = FetchCursor::new(since as f64);
        let mixed = vec![
            txn(1, since + 30),
            txn(2, since - 10),
            txn(3, since),
            txn(4, since + 5),
            txn(5, since - 1),
        ];

        let mut decisions = Vec::new();
        cursor.absorb(mixed, |t, kept| decisions.push((t.id.to_string(), kept)));

        assert_eq!(
            decisions,
            vec![
                ("txn_1".to_string(), true),
                ("txn_2".to_string(), false),
                ("txn_3".to_string(), true),
                ("txn_4".to_string(), true),
                ("txn_5".to_string(), false),
            ]
        );
        // Short page but with matches: keep going.
        assert!(cursor.has_more());
        let ids: Vec<_> = cursor
            .into_transactions()
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, vec!["txn_1", "txn_3", "txn_4"]);
    }

    #[test]
    fn test_validate_cutoff() {
        assert_eq!(validate_cutoff(1_700_000_000.0).unwrap(), 1_700_000_000.0);
        assert_eq!(validate_cutoff(-5.5).unwrap(), -5.5);
        assert!(matches!(validate_cutoff(f64::NAN), Err(Error::InvalidArgument(_))));
        assert!(matches!(validate_cutoff(f64::INFINITY), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            validate_cutoff(f64::NEG_INFINITY),
            Err(Error::InvalidArgument(_))
        ));
    }
}
