//! Single point of egress to the backend.
//! The client attaches the bearer token from the token store to every
//! outgoing request, always sends cookies so the HTTP-only refresh cookie can
//! flow, and recovers from 401 responses by refreshing the access token and
//! replaying the original request exactly once. Concurrent 401s coalesce
//! behind a single in-flight refresh. On an unrecoverable refresh failure the
//! client clears the token store and forces navigation to the login entry
//! point; no other layer is allowed to redirect.

use std::sync::Arc;

use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::token_store::TokenStore;

pub mod navigator;

use navigator::Navigator;

/// Result of one send: success payload, or a 401 together with the token the
/// request went out with (needed to decide whether a refresh is still due).
enum SendOutcome {
    Ok(Value),
    Unauthorized { token_at_send: Option<String> },
}

struct ClientInner {
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<TokenStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    /// Serializes refresh attempts so concurrent 401s produce one round-trip.
    refresh_gate: Mutex<()>,
}

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    pub fn new(
        cfg: &Config,
        tokens: Arc<TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url: cfg.base_url.trim_end_matches('/').to_string(),
                client,
                tokens,
                navigator,
                login_path: cfg.login_path.clone(),
                refresh_gate: Mutex::new(()),
            }),
        })
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.inner.tokens
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> ApiResult<Value> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> ApiResult<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> ApiResult<Value> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::DELETE, path, None).await
    }

    /// Send a request with 401 recovery: on the first 401, refresh the access
    /// token and replay the original request once with the new token. The
    /// replay's outcome is returned as-is; a second 401 passes through.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<Value> {
        match self.send_once(&method, path, body, None).await? {
            SendOutcome::Ok(v) => Ok(v),
            SendOutcome::Unauthorized { token_at_send } => {
                debug!(target: "http", "401 on {} {}, attempting token refresh", method, path);
                let fresh = self.refresh_access_token(token_at_send).await?;
                match self.send_once(&method, path, body, Some(fresh.as_str())).await? {
                    SendOutcome::Ok(v) => Ok(v),
                    // Refreshed token rejected too; no further retries.
                    SendOutcome::Unauthorized { .. } => Err(ApiError::Unauthorized),
                }
            }
        }
    }

    /// Explicit pre-emptive refresh, independent of the 401 path. Stores the
    /// minted token before returning it.
    pub async fn force_refresh(&self) -> ApiResult<String> {
        self.refresh_access_token(self.inner.tokens.get()).await
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        override_token: Option<&str>,
    ) -> ApiResult<SendOutcome> {
        let url = self.endpoint(path)?;
        let token = match override_token {
            Some(t) => Some(t.to_string()),
            None => self.inner.tokens.get(),
        };
        let mut req = self.inner.client.request(method.clone(), url);
        if let Some(t) = token.as_deref() {
            req = req.bearer_auth(t);
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Ok(SendOutcome::Unauthorized { token_at_send: token });
        }
        let text = resp.text().await?;
        if status.is_success() {
            if text.trim().is_empty() {
                // e.g. 204 on DELETE
                return Ok(SendOutcome::Ok(Value::Null));
            }
            let v = serde_json::from_str(&text)
                .map_err(|e| ApiError::decode(format!("invalid JSON response: {}", e)))?;
            return Ok(SendOutcome::Ok(v));
        }
        // Error bodies are parsed leniently and passed through unmodified.
        let body_val: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        if status == StatusCode::BAD_REQUEST {
            Err(ApiError::Validation { body: body_val })
        } else {
            Err(ApiError::Http { status: status.as_u16(), body: body_val })
        }
    }

    /// Single-flight refresh. `stale` is the token the caller's failed
    /// request went out with; if another caller already refreshed while we
    /// waited on the gate, the store holds a different token and we reuse it
    /// instead of refreshing again.
    async fn refresh_access_token(&self, stale: Option<String>) -> ApiResult<String> {
        let _gate = self.inner.refresh_gate.lock().await;
        if let Some(current) = self.inner.tokens.get() {
            if stale.as_deref() != Some(current.as_str()) {
                debug!(target: "http", "reusing token refreshed by a concurrent request");
                return Ok(current);
            }
        }
        match self.refresh_once().await {
            Ok(token) => {
                self.inner.tokens.set(token.as_str());
                debug!(target: "http", "access token refreshed");
                Ok(token)
            }
            Err(err) => {
                warn!(target: "session", "token refresh failed, session expired: {}", err);
                self.inner.tokens.clear();
                self.inner.navigator.hard_redirect(&self.inner.login_path);
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Direct call to the refresh endpoint: same cookie jar, but no bearer
    /// header and no 401 handling, so it can never re-enter the interceptor
    /// path. The refresh cookie is attached by the cookie store.
    async fn refresh_once(&self) -> ApiResult<String> {
        let url = self.endpoint("/auth/refresh/")?;
        let resp = self
            .inner
            .client
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            return Err(ApiError::Http { status: status.as_u16(), body });
        }
        let v: Value = resp.json().await?;
        v.get("access")
            .and_then(|s| s.as_str())
            .map(str::to_string)
            .ok_or_else(|| ApiError::decode("refresh response missing access token"))
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Url::parse(&format!("{}{}", self.inner.base_url, path))
            .map_err(|e| ApiError::decode(format!("invalid endpoint {}: {}", path, e)))
    }
}
