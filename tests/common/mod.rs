//! Shared helpers for the integration tests.
//!
//! [`MockTransport`] answers requests from per-route queues and records
//! every request it sees, so tests can assert on request counts, paths,
//! query parameters, headers and bodies without any network access.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use dasbudget_rs::client::{HttpRequest, HttpResponse, HttpTransport};
use dasbudget_rs::observer::{LifecycleEvent, Observer};
use dasbudget_rs::{ClientConfig, DasBudgetClient, Endpoints, TransportError};

pub const API_BASE: &str = "http://api.test";
pub const IDENTITY_BASE: &str = "http://identity.test";
pub const TOKEN_PATH: &str = "/v1/token";

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Clone)]
enum Reply {
    Response(HttpResponse),
    Unreachable(String),
}

/// Scripted [`HttpTransport`].
///
/// Replies queued for a route are handed out in order; the last one is
/// repeated once the queue is down to it. Unknown routes get a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn route_key(method: &Method, path: &str) -> String {
    format!("{} {}", method, path)
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport with a working token endpoint (one hour lifetime).
    pub fn authenticated() -> Arc<Self> {
        let transport = Self::new();
        transport.on(Method::POST, TOKEN_PATH, token_response(3600));
        transport
    }

    /// Queue a reply for `method path`.
    pub fn on(&self, method: Method, path: &str, response: HttpResponse) {
        self.routes
            .lock()
            .unwrap()
            .entry(route_key(&method, path))
            .or_default()
            .push_back(Reply::Response(response));
    }

    /// Queue a JSON reply with status 200.
    pub fn on_json(&self, method: Method, path: &str, body: Value) {
        self.on(method, path, HttpResponse::json(200, &body));
    }

    /// Queue a transport failure (no response at all).
    pub fn on_unreachable(&self, method: Method, path: &str, reason: &str) {
        self.routes
            .lock()
            .unwrap()
            .entry(route_key(&method, path))
            .or_default()
            .push_back(Reply::Unreachable(reason.to_string()));
    }

    /// Drop all queued replies for `method path` and queue `response`.
    pub fn replace(&self, method: Method, path: &str, response: HttpResponse) {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.entry(route_key(&method, path)).or_default();
        queue.clear();
        queue.push_back(Reply::Response(response));
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to one path.
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }

    /// Number of token exchanges.
    pub fn token_requests(&self) -> usize {
        self.requests_to(TOKEN_PATH).len()
    }

    /// Requests to anything but the token endpoint.
    pub fn api_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() != TOKEN_PATH)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = route_key(&request.method, request.url.path());
        self.requests.lock().unwrap().push(request);

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Unreachable(reason)) => Err(TransportError::InvalidResponse(reason)),
            None => Ok(HttpResponse::json(404, &json!({ "error": format!("no route for {}", key) }))),
        }
    }
}

/// Observer that keeps a compact log line per event.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<String>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl Observer for EventLog {
    fn observe(&self, event: &LifecycleEvent<'_>) {
        let line = match event {
            LifecycleEvent::TokenRefreshStarted => "refresh:start".to_string(),
            LifecycleEvent::TokenRefreshed { .. } => "refresh:ok".to_string(),
            LifecycleEvent::TokenRefreshFailed { .. } => "refresh:failed".to_string(),
            LifecycleEvent::Request { method, path, context } => {
                format!("request:{} {} [{}]", method, path, context.header_value())
            }
            LifecycleEvent::Response { status, .. } => format!("response:{}", status),
            LifecycleEvent::PageFetched { page, fetched, .. } => {
                format!("page:{}:{}", page, fetched)
            }
            LifecycleEvent::FilterDecision {
                transaction_id,
                kept,
                ..
            } => format!("filter:{}:{}", transaction_id, kept),
            LifecycleEvent::PaginationFinished { pages, returned } => {
                format!("done:{}:{}", pages, returned)
            }
        };
        self.events.lock().unwrap().push(line);
    }
}

pub fn endpoints() -> Endpoints {
    Endpoints::custom(API_BASE, IDENTITY_BASE).unwrap()
}

pub fn config() -> ClientConfig {
    ClientConfig::new("refresh-secret", "api-key").with_endpoints(endpoints())
}

/// Client against the mock backends.
pub fn client(transport: &Arc<MockTransport>) -> DasBudgetClient {
    init_logging();
    DasBudgetClient::with_transport(config(), transport.clone())
}

/// Client against the mock backends that records lifecycle events.
pub fn observed_client(
    transport: &Arc<MockTransport>,
    config: ClientConfig,
) -> (DasBudgetClient, Arc<EventLog>) {
    init_logging();
    let log = EventLog::new();
    let client = DasBudgetClient::with_observer(config, transport.clone(), log.clone());
    (client, log)
}

pub fn token_response(expires_in: i64) -> HttpResponse {
    HttpResponse::json(
        200,
        &json!({
            "access_token": "access-token",
            "expires_in": expires_in.to_string(),
            "token_type": "Bearer",
            "refresh_token": "refresh-secret",
            "id_token": "access-token",
            "user_id": "user_1",
            "project_id": "1234",
        }),
    )
}

pub fn txn(id: &str, created_secs: i64) -> Value {
    json!({
        "id": id,
        "created_at": Utc.timestamp_opt(created_secs, 0).unwrap().to_rfc3339(),
        "name": format!("Merchant {}", id),
        "amount": "-12.34",
    })
}

/// `count` transactions all created at `created_secs`.
pub fn txns(prefix: &str, count: usize, created_secs: i64) -> Vec<Value> {
    (0..count)
        .map(|i| txn(&format!("{}_{}", prefix, i), created_secs))
        .collect()
}

pub fn page(transactions: Vec<Value>) -> Value {
    json!({
        "page": 1,
        "limit": 40,
        "total": transactions.len(),
        "transactions": transactions,
        "items": {},
        "accounts": {},
        "categories": {},
        "buckets": {},
    })
}

pub fn ids(transactions: &[dasbudget_rs::models::Transaction]) -> Vec<String> {
    transactions.iter().map(|t| t.id.to_string()).collect()
}
