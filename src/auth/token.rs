//! Access token lifecycle.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::client::transport::{HttpRequest, HttpTransport};
use crate::error::TransportError;
use crate::observer::{LifecycleEvent, Observer};
use crate::{Error, Result};

/// An access token together with its expiry.
///
/// Token and expiry only ever exist together.
struct BearerToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

/// Credential state owned by the [`TokenManager`].
#[derive(Default)]
pub(crate) struct Credential {
    bearer: Option<BearerToken>,
    subject_id: Option<String>,
}

impl Credential {
    /// Whether a request sent at `now` needs a fresh token first.
    ///
    /// The margin is inclusive: a token expiring exactly `margin` from now
    /// is already considered stale.
    pub(crate) fn needs_refresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        match &self.bearer {
            None => true,
            Some(bearer) => now >= bearer.expires_at - margin,
        }
    }
}

/// Keeps a valid bearer token around for the client.
///
/// The manager exchanges the long-lived refresh secret for short-lived
/// access tokens (about an hour) at the identity backend. Call
/// [`ensure_valid`](Self::ensure_valid) before every authenticated request;
/// it refreshes proactively once the token is within the safety margin of
/// its expiry and does nothing otherwise.
///
/// # Thread Safety
///
/// Refreshes are serialized behind a gate. When several tasks find the
/// token stale at the same time, the first one refreshes and the others
/// reuse its result.
pub struct TokenManager {
    state: RwLock<Credential>,
    refresh_gate: Mutex<()>,
    refresh_token: SecretString,
    api_key: SecretString,
    token_url: Url,
    margin: Duration,
    transport: Arc<dyn HttpTransport>,
    observer: Arc<dyn Observer>,
}

impl TokenManager {
    pub(crate) fn new(
        refresh_token: SecretString,
        api_key: SecretString,
        token_url: Url,
        margin: Duration,
        transport: Arc<dyn HttpTransport>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            state: RwLock::new(Credential::default()),
            refresh_gate: Mutex::new(()),
            refresh_token,
            api_key,
            token_url,
            margin,
            transport,
            observer,
        }
    }

    /// Ensure the access token is valid, refreshing if necessary.
    ///
    /// Refreshes when there is no token yet or when the current time is
    /// within the safety margin (5 minutes by default) of its expiry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the refresh fails.
    pub async fn ensure_valid(&self) -> Result<()> {
        if !self.needs_refresh().await {
            return Ok(());
        }

        let _gate = self.refresh_gate.lock().await;
        // Another task may have refreshed while we waited.
        if !self.needs_refresh().await {
            return Ok(());
        }
        self.exchange_and_store().await
    }

    /// Exchange the refresh secret for a new access token.
    ///
    /// On success the token, its expiry and the subject id are replaced
    /// together. On failure the previous credential is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the identity backend is
    /// unreachable or rejects the exchange. The call is never retried.
    pub async fn refresh(&self) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;
        self.exchange_and_store().await
    }

    /// Whether the token must be refreshed before the next request.
    pub async fn needs_refresh(&self) -> bool {
        self.state.read().await.needs_refresh(Utc::now(), self.margin)
    }

    /// Returns `true` once a token has been obtained.
    pub async fn has_token(&self) -> bool {
        self.state.read().await.bearer.is_some()
    }

    /// Expiry of the current token.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.bearer.as_ref().map(|b| b.expires_at)
    }

    /// User id reported by the last successful refresh.
    pub async fn subject_id(&self) -> Option<String> {
        self.state.read().await.subject_id.clone()
    }

    /// Current access token, without checking expiry.
    pub(crate) async fn access_token(&self) -> Option<SecretString> {
        self.state
            .read()
            .await
            .bearer
            .as_ref()
            .map(|b| SecretString::from(b.token.expose_secret().to_string()))
    }

    async fn exchange_and_store(&self) -> Result<()> {
        self.observer.observe(&LifecycleEvent::TokenRefreshStarted);

        let (token, expires_at) = match self.exchange().await {
            Ok(issued) => issued,
            Err(err) => {
                tracing::warn!(error = %err, "Access token refresh failed");
                self.observer.observe(&LifecycleEvent::TokenRefreshFailed {
                    reason: err.to_string(),
                });
                return Err(Error::Authentication(err));
            }
        };

        {
            let mut state = self.state.write().await;
            state.bearer = Some(BearerToken {
                token: SecretString::from(token.access_token),
                expires_at,
            });
            state.subject_id = token.user_id;
        }

        self.observer
            .observe(&LifecycleEvent::TokenRefreshed { expires_at });
        Ok(())
    }

    async fn exchange(
        &self,
    ) -> std::result::Result<(TokenResponse, DateTime<Utc>), TransportError> {
        let request = HttpRequest::new(Method::POST, self.token_url.clone())
            .with_query("key", self.api_key.expose_secret())
            .with_json(serde_json::json!({
                "grant_type": "refresh_token",
                "refresh_token": self.refresh_token.expose_secret(),
            }));

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(response.into_error());
        }

        let token: TokenResponse = response.decode()?;
        let expires_at = expiry_after(Utc::now(), token.expires_in)?;
        Ok((token, expires_at))
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_url", &self.token_url.as_str())
            .field("access_token", &"[REDACTED]")
            .field("margin", &self.margin)
            .finish()
    }
}

/// Expiry of a token issued at `now` with a lifetime of `expires_in` seconds.
fn expiry_after(
    now: DateTime<Utc>,
    expires_in: i64,
) -> std::result::Result<DateTime<Utc>, TransportError> {
    if expires_in < 0 {
        return Err(TransportError::InvalidResponse(format!(
            "negative token lifetime: {}",
            expires_in
        )));
    }
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            TransportError::InvalidResponse(format!("token lifetime out of range: {}", expires_in))
        })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(deserialize_with = "seconds")]
    expires_in: i64,
    #[serde(default)]
    user_id: Option<String>,
}

/// Token lifetimes arrive as `3600` or `"3600"` depending on the backend.
fn seconds<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Int(secs) => Ok(secs),
        Seconds::Float(secs) => Ok(secs as i64),
        Seconds::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential_expiring_at(expires_at: DateTime<Utc>) -> Credential {
        Credential {
            bearer: Some(BearerToken {
                token: SecretString::from("token".to_string()),
                expires_at,
            }),
            subject_id: None,
        }
    }

    #[test]
    fn test_empty_credential_needs_refresh() {
        assert!(Credential::default().needs_refresh(Utc::now(), Duration::minutes(5)));
    }

    #[test]
    fn test_margin_is_inclusive() {
        let now = Utc::now();
        let margin = Duration::minutes(5);

        // Exactly at the margin boundary.
        assert!(credential_expiring_at(now + margin).needs_refresh(now, margin));
        // Inside the margin.
        assert!(credential_expiring_at(now + Duration::minutes(4)).needs_refresh(now, margin));
        // Already expired.
        assert!(credential_expiring_at(now - Duration::seconds(1)).needs_refresh(now, margin));
        // Comfortably valid.
        assert!(!credential_expiring_at(now + Duration::minutes(6)).needs_refresh(now, margin));
    }

    #[test]
    fn test_expiry_after() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, 3600).unwrap(), now + Duration::hours(1));
        assert_eq!(expiry_after(now, 0).unwrap(), now);
        assert!(matches!(
            expiry_after(now, -1),
            Err(TransportError::InvalidResponse(_))
        ));
        assert!(matches!(
            expiry_after(now, 99_999_999_999_999),
            Err(TransportError::InvalidResponse(_))
        ));
        assert!(matches!(
            expiry_after(now, i64::MAX),
            Err(TransportError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_token_response_lifetime_formats() {
        let numeric: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":3600,"user_id":"u1"}"#)
                .unwrap();
        assert_eq!(numeric.expires_in, 3600);
        assert_eq!(numeric.user_id.as_deref(), Some("u1"));

        let text: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":"3600"}"#).unwrap();
        assert_eq!(text.expires_in, 3600);
        assert!(text.user_id.is_none());

        assert!(serde_json::from_str::<TokenResponse>(
            r#"{"access_token":"a","expires_in":"soon"}"#
        )
        .is_err());
    }
}
