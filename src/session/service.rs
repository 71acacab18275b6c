//! Session service: login, logout, current-user fetch and explicit refresh.
//! Every operation returns a normalized outcome; nothing panics past this
//! boundary and no raw transport error escapes. Redirects are never triggered
//! here; that is the HTTP client's job.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{extract_error_message, ApiError, ApiResult};
use crate::http::ApiClient;
use crate::session::models::UserProfile;
use crate::token_store::TokenStore;

const LOGIN_FALLBACK: &str = "could not sign in";

pub struct AuthService {
    api: ApiClient,
    tokens: Arc<TokenStore>,
}

impl AuthService {
    pub fn new(api: ApiClient, tokens: Arc<TokenStore>) -> Self {
        Self { api, tokens }
    }

    /// Log in with a username or email (the backend disambiguates). On
    /// success the returned access token is stored and the profile returned.
    /// Credential failures surface the backend's own message verbatim.
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<UserProfile> {
        let body = json!({"username_email": identifier, "password": password});
        match self.api.post("/auth/login/", Some(&body)).await {
            Ok(v) => {
                let Some(access) = v.get("access").and_then(|s| s.as_str()) else {
                    return Err(ApiError::decode("login response missing access token"));
                };
                let user: UserProfile =
                    serde_json::from_value(v.get("user").cloned().unwrap_or(Value::Null))
                        .map_err(|e| ApiError::decode(format!("bad user payload: {}", e)))?;
                self.tokens.set(access);
                info!(target: "session", "login ok user={} role={}", user.username, user.role.name);
                Ok(user)
            }
            Err(ApiError::Validation { body }) => {
                Err(ApiError::credential(extract_error_message(&body, LOGIN_FALLBACK)))
            }
            Err(ApiError::Http { body, .. }) => {
                Err(ApiError::credential(extract_error_message(&body, LOGIN_FALLBACK)))
            }
            Err(ApiError::Unauthorized) | Err(ApiError::SessionExpired) => {
                Err(ApiError::credential(LOGIN_FALLBACK))
            }
            Err(other) => Err(other),
        }
    }

    /// Log out. The local token is cleared before the backend is notified, so
    /// local state is clean even if the network call fails; the backend call
    /// is best-effort and its outcome is ignored. Always succeeds.
    pub async fn logout(&self) {
        self.tokens.clear();
        if let Err(err) = self.api.post("/auth/logout/", None).await {
            debug!(target: "session", "logout notify failed (ignored): {}", err);
        }
        // The logout call itself may have minted a token through the 401
        // interceptor; the local guarantee is that none survives.
        self.tokens.clear();
        info!(target: "session", "logged out");
    }

    /// Fetch the authenticated profile. Used for page-load bootstrap and for
    /// manual refresh-after-edit.
    pub async fn current_user(&self) -> ApiResult<UserProfile> {
        let v = self.api.get("/auth/me/").await?;
        serde_json::from_value(v).map_err(|e| ApiError::decode(format!("bad user payload: {}", e)))
    }

    /// Explicit pre-emptive token refresh; the interceptor path normally
    /// makes this unnecessary.
    pub async fn refresh(&self) -> ApiResult<String> {
        self.api.force_refresh().await
    }

    /// Cheap token-presence probe for UI decisions. Does not prove the token
    /// is still valid.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_set()
    }
}
