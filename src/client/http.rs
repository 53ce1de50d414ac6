//! HTTP client implementation for the Das Budget API.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, ORIGIN, PRAGMA,
    REFERER,
};
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};

use crate::api::{AccountsService, BucketsService, BudgetsService, ItemsService, TransactionsService};
use crate::auth::TokenManager;
use crate::error::TransportError;
use crate::models::{BudgetId, TenantContext};
use crate::observer::{LifecycleEvent, NoopObserver, Observer, TracingObserver};
use crate::{Error, Result};

use super::config::{ClientConfig, ClientIdentity};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

const CONTEXT_HEADER: &str = "x-das-context-id";
const PLATFORM_HEADER: &str = "x-das-platform";
const BUILD_HEADER: &str = "x-das-build";
const VERSION_HEADER: &str = "x-das-version";

/// The main client for interacting with the Das Budget API.
///
/// This client provides access to all API services through method calls
/// that return service structs. The client manages the access token, the
/// selected budget, request building and response parsing. Cloning is
/// cheap and clones share all state.
///
/// # Example
///
/// ```no_run
/// use dasbudget_rs::{ClientConfig, DasBudgetClient, TransactionsQuery};
///
/// # async fn example() -> dasbudget_rs::Result<()> {
/// let client = DasBudgetClient::new(ClientConfig::new("refresh-token", "api-key"))?;
/// client.initialize().await?;
///
/// // Pick a budget for all further calls
/// let budgets = client.budgets().list().await?;
/// if let Some(budget) = budgets.first() {
///     client.set_budget_id(Some(budget.id.clone()));
/// }
///
/// // Everything created in the last week
/// let week_ago = chrono::Utc::now().timestamp() as f64 - 7.0 * 86_400.0;
/// let recent = client
///     .transactions()
///     .list(TransactionsQuery::since(week_ago))
///     .await?;
/// println!("{} recent transactions", recent.len());
/// # Ok(())
/// # }
/// ```
pub struct DasBudgetClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) tokens: TokenManager,
    pub(crate) config: ClientConfig,
    pub(crate) observer: Arc<dyn Observer>,
    default_budget: RwLock<Option<BudgetId>>,
}

impl DasBudgetClient {
    /// Create a client that talks to the service over HTTPS.
    ///
    /// No request is sent until the first operation (or
    /// [`initialize`](Self::initialize)).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new(http))))
    }

    /// Create a client from environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client on top of a custom transport.
    ///
    /// Lifecycle events go to `tracing` when `config.debug` is set and are
    /// dropped otherwise.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let observer: Arc<dyn Observer> = if config.debug {
            Arc::new(TracingObserver)
        } else {
            Arc::new(NoopObserver)
        };
        Self::with_observer(config, transport, observer)
    }

    /// Create a client with a custom transport and lifecycle observer.
    pub fn with_observer(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let tokens = TokenManager::new(
            secret_copy(&config.refresh_token),
            secret_copy(&config.api_key),
            config.endpoints.token_url().clone(),
            config.refresh_margin,
            transport.clone(),
            observer.clone(),
        );

        Self {
            inner: Arc::new(ClientInner {
                transport,
                tokens,
                default_budget: RwLock::new(config.default_budget_id.clone()),
                config,
                observer,
            }),
        }
    }

    /// Obtain the first access token.
    ///
    /// Optional: every operation obtains a token on demand. Calling this
    /// up front surfaces a bad refresh secret or API key immediately.
    pub async fn initialize(&self) -> Result<()> {
        tracing::debug!("Initializing client");
        self.inner.tokens.refresh().await
    }

    /// Get the transactions service.
    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.inner.clone())
    }

    /// Get the buckets service (expenses, goals and vaults).
    pub fn buckets(&self) -> BucketsService {
        BucketsService::new(self.inner.clone())
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the budgets service.
    pub fn budgets(&self) -> BudgetsService {
        BudgetsService::new(self.inner.clone())
    }

    /// Get the linked items service (institution logins and refreshes).
    pub fn items(&self) -> ItemsService {
        ItemsService::new(self.inner.clone())
    }

    /// Select the budget used by all further calls that do not name one.
    ///
    /// `None` goes back to the server's default (the oldest budget).
    pub fn set_budget_id(&self, budget_id: Option<BudgetId>) {
        tracing::debug!(budget_id = ?budget_id, "Setting default budget");
        *self
            .inner
            .default_budget
            .write()
            .unwrap_or_else(PoisonError::into_inner) = budget_id;
    }

    /// The budget currently used by default.
    pub fn budget_id(&self) -> Option<BudgetId> {
        self.inner.default_budget()
    }

    /// Manually refresh the access token.
    pub async fn refresh_session(&self) -> Result<()> {
        self.inner.tokens.refresh().await
    }

    /// Get the token manager.
    pub fn tokens(&self) -> &TokenManager {
        &self.inner.tokens
    }
}

impl ClientInner {
    fn default_budget(&self) -> Option<BudgetId> {
        self.default_budget
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Pick the budget for one call: the explicit override, else the
    /// client default, else the server default.
    pub(crate) fn resolve_context(&self, budget_override: Option<&BudgetId>) -> TenantContext {
        match budget_override {
            Some(id) => TenantContext::Budget(id.clone()),
            None => TenantContext::from(self.default_budget()),
        }
    }

    /// Send one authenticated request and return the successful response.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        budget: Option<&BudgetId>,
    ) -> Result<HttpResponse> {
        self.tokens.ensure_valid().await?;

        let context = self.resolve_context(budget);
        let token = self.tokens.access_token().await.ok_or_else(|| {
            Error::Authentication(TransportError::InvalidResponse(
                "no access token after refresh".to_string(),
            ))
        })?;
        let headers = build_headers(&self.config.identity, token.expose_secret(), &context)
            .map_err(Error::Fetch)?;
        let url = self.config.endpoints.api_url(path).map_err(|e| Error::Fetch(e.into()))?;

        let mut request = HttpRequest::new(method.clone(), url).with_headers(headers);
        for (key, value) in query {
            request = request.with_query(*key, value);
        }
        if let Some(body) = body {
            request = request.with_json(body);
        }

        self.observer.observe(&LifecycleEvent::Request {
            method: &method,
            path,
            context: &context,
        });

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Request failed");
            Error::Fetch(e)
        })?;

        self.observer.observe(&LifecycleEvent::Response {
            method: &method,
            path,
            status: response.status,
        });

        if !response.is_success() {
            tracing::warn!(%method, path, status = response.status, "Request rejected");
            return Err(Error::Fetch(response.into_error()));
        }

        Ok(response)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        budget: Option<&BudgetId>,
    ) -> Result<T> {
        self.send(Method::GET, path, query, None, budget)
            .await?
            .decode()
            .map_err(Error::Fetch)
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        budget: Option<&BudgetId>,
    ) -> Result<T> {
        self.post_raw(path, body, budget)
            .await?
            .decode()
            .map_err(Error::Fetch)
    }

    /// Make a POST request and return the raw response.
    pub(crate) async fn post_raw<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        budget: Option<&BudgetId>,
    ) -> Result<HttpResponse> {
        let body = serde_json::to_value(body).map_err(|e| Error::Fetch(e.into()))?;
        self.send(Method::POST, path, &[], Some(body), budget).await
    }

    /// Make a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        budget: Option<&BudgetId>,
    ) -> Result<T> {
        let body = serde_json::to_value(body).map_err(|e| Error::Fetch(e.into()))?;
        self.send(Method::PUT, path, query, Some(body), budget)
            .await?
            .decode()
            .map_err(Error::Fetch)
    }
}

/// Build the header set for one request.
///
/// Pure function of the token, the budget context and the client identity.
pub(crate) fn build_headers(
    identity: &ClientIdentity,
    token: &str,
    context: &TenantContext,
) -> std::result::Result<HeaderMap, TransportError> {
    fn value(name: &str, v: &str) -> std::result::Result<HeaderValue, TransportError> {
        HeaderValue::from_str(v).map_err(|_| TransportError::InvalidHeader(name.to_string()))
    }

    let mut headers = HeaderMap::new();
    let mut authorization = value("Authorization", &format!("Bearer {}", token))?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(ORIGIN, value("Origin", &identity.origin)?);
    headers.insert(
        REFERER,
        value("Referer", &format!("{}/", identity.origin.trim_end_matches('/')))?,
    );

    headers.insert(HeaderName::from_static(CONTEXT_HEADER), value("X-Das-Context-Id", context.header_value())?);
    headers.insert(HeaderName::from_static(PLATFORM_HEADER), value("X-Das-Platform", &identity.platform)?);
    headers.insert(HeaderName::from_static(BUILD_HEADER), value("X-Das-Build", &identity.build)?);
    headers.insert(HeaderName::from_static(VERSION_HEADER), value("X-Das-Version", &identity.version)?);

    Ok(headers)
}

fn secret_copy(secret: &secrecy::SecretString) -> secrecy::SecretString {
    secrecy::SecretString::from(secret.expose_secret().to_string())
}

impl Clone for DasBudgetClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for DasBudgetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DasBudgetClient")
            .field("config", &self.inner.config)
            .field("budget_id", &self.inner.default_budget())
            .finish()
    }
}
