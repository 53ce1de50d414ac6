//! Client configuration options.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::models::BudgetId;
use crate::{Error, Result};

const DEFAULT_API_BASE: &str = "https://api.dasbudget.com";
const DEFAULT_IDENTITY_BASE: &str = "https://securetoken.googleapis.com";
const TOKEN_PATH: &str = "/v1/token";

/// Base URLs of the two backends the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_base: Url,
    identity_base: Url,
    token_url: Url,
}

impl Endpoints {
    /// The production service.
    pub fn production() -> Self {
        Self::custom(DEFAULT_API_BASE, DEFAULT_IDENTITY_BASE).expect("static URLs are valid")
    }

    /// Custom base URLs, e.g. for a local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either base does not parse, cannot take
    /// a path, or does not yield a valid token endpoint.
    pub fn custom(api_base: &str, identity_base: &str) -> Result<Self> {
        let parse = |s: &str| -> Result<Url> {
            let url = Url::parse(s)
                .map_err(|e| Error::Config(format!("invalid base URL {}: {}", s, e)))?;
            if url.cannot_be_a_base() {
                return Err(Error::Config(format!("base URL {} cannot take a path", s)));
            }
            Ok(url)
        };
        let api_base = parse(api_base)?;
        let identity_base = parse(identity_base)?;
        let token_url = join(&identity_base, TOKEN_PATH).map_err(|e| {
            Error::Config(format!("invalid token URL under {}: {}", identity_base, e))
        })?;
        Ok(Self {
            api_base,
            identity_base,
            token_url,
        })
    }

    /// Resource API base (`/api/...` paths are appended).
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Identity backend base.
    pub fn identity_base(&self) -> &Url {
        &self.identity_base
    }

    /// Token exchange endpoint under the identity base.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Absolute URL of a resource API path such as `/api/context`.
    pub fn api_url(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        join(&self.api_base, path)
    }
}

// Appends instead of resolving, so a base with a path prefix keeps it.
fn join(base: &Url, path: &str) -> std::result::Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::production()
    }
}

/// Identity headers that make requests look like the first-party web app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// `X-Das-Platform`
    pub platform: String,
    /// `X-Das-Build`
    pub build: String,
    /// `X-Das-Version`
    pub version: String,
    /// `Origin`; `Referer` is derived from it
    pub origin: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            platform: "web".to_string(),
            build: "179".to_string(),
            version: "0.9.5".to_string(),
            origin: "https://app.dasbudget.com".to_string(),
        }
    }
}

/// Configuration for the Das Budget client.
///
/// # Example
///
/// ```
/// use dasbudget_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("refresh-token", "api-key")
///     .with_debug(true)
///     .with_budget_id("ctx_123")
///     .with_timeout(Duration::from_secs(60));
/// ```
pub struct ClientConfig {
    /// Long-lived refresh secret exchanged for access tokens
    pub refresh_token: SecretString,
    /// API key of the identity backend
    pub api_key: SecretString,
    /// Log lifecycle events through `tracing`
    pub debug: bool,
    /// Budget used when a call does not name one
    pub default_budget_id: Option<BudgetId>,
    /// Backend base URLs
    pub endpoints: Endpoints,
    /// Client identity headers
    pub identity: ClientIdentity,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// How long before expiry a token is refreshed
    pub refresh_margin: chrono::Duration,
}

impl ClientConfig {
    /// Create a configuration with the required credentials and defaults
    /// for everything else.
    pub fn new(refresh_token: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            refresh_token: SecretString::from(refresh_token.into()),
            api_key: SecretString::from(api_key.into()),
            debug: false,
            default_budget_id: None,
            endpoints: Endpoints::production(),
            identity: ClientIdentity::default(),
            timeout: Duration::from_secs(30),
            user_agent: format!("dasbudget-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            refresh_margin: chrono::Duration::minutes(5),
        }
    }

    /// Build a configuration from environment variables.
    ///
    /// Reads `DASBUDGET_REFRESH_TOKEN` and `DASBUDGET_API_KEY` (required),
    /// `DASBUDGET_DEBUG` and `DASBUDGET_BUDGET_ID` (optional).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{} must be set", key)))
        };

        let mut config = Self::new(
            required("DASBUDGET_REFRESH_TOKEN")?,
            required("DASBUDGET_API_KEY")?,
        );

        if let Some(debug) = lookup("DASBUDGET_DEBUG") {
            config.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(budget) = lookup("DASBUDGET_BUDGET_ID").filter(|v| !v.is_empty()) {
            config.default_budget_id = Some(BudgetId::new(budget));
        }

        Ok(config)
    }

    /// Enable or disable debug logging of lifecycle events.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the budget used when a call does not name one.
    pub fn with_budget_id(mut self, budget_id: impl Into<BudgetId>) -> Self {
        self.default_budget_id = Some(budget_id.into());
        self
    }

    /// Point the client at different backends.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Override the client identity headers.
    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set how long before expiry a token is refreshed.
    pub fn with_refresh_margin(mut self, margin: chrono::Duration) -> Self {
        self.refresh_margin = margin;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("refresh_token", &"[REDACTED]")
            .field("api_key", &"[REDACTED]")
            .field("debug", &self.debug)
            .field("default_budget_id", &self.default_budget_id)
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .field("refresh_margin", &self.refresh_margin)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("rt", "key");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.refresh_margin, chrono::Duration::minutes(5));
        assert!(!config.debug);
        assert!(config.default_budget_id.is_none());
        assert_eq!(config.endpoints.api_base().as_str(), "https://api.dasbudget.com/");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::new("super-secret-refresh", "super-secret-key");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super-secret"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("DASBUDGET_REFRESH_TOKEN", "rt"),
            ("DASBUDGET_API_KEY", "key"),
            ("DASBUDGET_DEBUG", "TRUE"),
            ("DASBUDGET_BUDGET_ID", "ctx_9"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.refresh_token.expose_secret(), "rt");
        assert!(config.debug);
        assert_eq!(config.default_budget_id, Some(BudgetId::new("ctx_9")));
    }

    #[test]
    fn test_from_lookup_missing_required() {
        let err = ClientConfig::from_lookup(|k| {
            (k == "DASBUDGET_REFRESH_TOKEN").then(|| "rt".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("DASBUDGET_API_KEY")));
    }

    #[test]
    fn test_custom_endpoints() {
        let endpoints = Endpoints::custom("http://127.0.0.1:8080", "http://127.0.0.1:9099").unwrap();
        assert_eq!(endpoints.identity_base().port(), Some(9099));
        assert!(Endpoints::custom("not a url", "http://localhost").is_err());
    }

    #[test]
    fn test_token_url_is_joined_once() {
        let endpoints = Endpoints::custom("http://api.local", "http://id.local/prefix").unwrap();
        assert_eq!(endpoints.token_url().as_str(), "http://id.local/prefix/v1/token");

        // A base that parses but cannot take a path is refused up front.
        let err = Endpoints::custom("http://api.local", "mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("cannot take a path")));
    }

    #[test]
    fn test_endpoint_urls_keep_path_prefix() {
        let endpoints = Endpoints::custom("http://localhost:8080/mock/", "http://localhost:9099").unwrap();
        assert_eq!(
            endpoints.api_url("/api/item/refreshes").unwrap().as_str(),
            "http://localhost:8080/mock/api/item/refreshes"
        );
        assert_eq!(
            endpoints.token_url().as_str(),
            "http://localhost:9099/v1/token"
        );
        assert_eq!(
            Endpoints::production().api_url("/api/context").unwrap().as_str(),
            "https://api.dasbudget.com/api/context"
        );
    }
}
