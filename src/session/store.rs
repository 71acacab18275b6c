//! Observable session store: the authoritative `{user, loading, error}`
//! state container. UI layers subscribe for change notifications instead of
//! polling; the store itself is UI-framework agnostic.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::error::ApiResult;
use crate::session::models::{Role, UserProfile};
use crate::session::service::AuthService;
use crate::token_store::TokenStore;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        // loading starts true: the guard must not redirect before bootstrap
        // has settled.
        Self { user: None, loading: true, error: None }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|u| u.role())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&SessionState) + Send + Sync>;

pub struct SessionStore {
    service: Arc<AuthService>,
    tokens: Arc<TokenStore>,
    state: RwLock<SessionState>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_sub: AtomicU64,
    bootstrapped: AtomicBool,
}

impl SessionStore {
    pub fn new(service: Arc<AuthService>, tokens: Arc<TokenStore>) -> Self {
        Self {
            service,
            tokens,
            state: RwLock::new(SessionState::default()),
            subscribers: Mutex::new(Vec::new()),
            next_sub: AtomicU64::new(0),
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn subscribe(&self, f: impl Fn(&SessionState) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_sub.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|(sid, _)| *sid != id);
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self.state.write();
            f(&mut state);
            state.clone()
        };
        // Notify outside the state lock.
        for (_, sub) in self.subscribers.lock().iter() {
            sub(&snapshot);
        }
    }

    /// Startup check, runs once per process. With a token in hand the profile
    /// is fetched; a failed fetch tears the session down fully. With no token
    /// the store settles immediately without any network call (a valid
    /// refresh cookie may still silently upgrade the first authenticated
    /// request via the 401 interceptor).
    pub async fn bootstrap(&self) {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.tokens.is_set() {
            self.update(|s| s.loading = true);
            match self.service.current_user().await {
                Ok(user) => {
                    debug!(target: "session", "bootstrap restored session for {}", user.username);
                    self.update(|s| {
                        s.user = Some(user);
                        s.loading = false;
                    });
                }
                Err(err) => {
                    debug!(target: "session", "bootstrap failed, clearing session: {}", err);
                    self.service.logout().await;
                    self.update(|s| {
                        s.user = None;
                        s.loading = false;
                    });
                }
            }
        } else {
            self.update(|s| s.loading = false);
        }
    }

    /// Log in and populate the store. The profile is also returned directly
    /// so callers can pick an initial route by role without waiting for a
    /// change notification.
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<UserProfile> {
        self.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.service.login(identifier, password).await;
        match &result {
            Ok(user) => {
                let user = user.clone();
                self.update(|s| {
                    s.user = Some(user);
                    s.error = None;
                    s.loading = false;
                });
            }
            Err(err) => {
                let msg = err.to_string();
                self.update(|s| {
                    s.error = Some(msg);
                    s.loading = false;
                });
            }
        }
        result
    }

    /// Log out; the user is cleared regardless of the backend outcome.
    pub async fn logout(&self) {
        self.update(|s| s.loading = true);
        self.service.logout().await;
        self.update(|s| {
            s.user = None;
            s.loading = false;
        });
    }

    /// Re-fetch the profile, e.g. after an edit. Replaces the snapshot on
    /// success; leaves state untouched on failure.
    pub async fn refresh_user(&self) -> bool {
        match self.service.current_user().await {
            Ok(user) => {
                self.update(|s| s.user = Some(user));
                true
            }
            Err(err) => {
                debug!(target: "session", "refresh_user failed: {}", err);
                false
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.read().role()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role().map(|r| roles.contains(&r)).unwrap_or(false)
    }

    /// Surface for errors set by failed operations, mirroring `state().error`.
    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }
}
