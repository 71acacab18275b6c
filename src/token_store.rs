//! In-memory access-token holder.
//! The token deliberately never touches persistent storage: a fresh process
//! starts empty and re-validates through the HTTP-only refresh cookie. One
//! store instance is constructed per process and shared by reference with the
//! HTTP client and the session service.

use parking_lot::RwLock;

#[derive(Default)]
pub struct TokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current access token. Last write wins; a fresher token is
    /// always preferred over a stale one.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_set(&self) -> bool {
        self.token.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_last_set_value() {
        let store = TokenStore::new();
        assert_eq!(store.get(), None);
        store.set("first");
        assert_eq!(store.get(), Some("first".to_string()));
        store.set("second");
        assert_eq!(store.get(), Some("second".to_string()));
        assert!(store.is_set());
    }

    #[test]
    fn clear_always_yields_absent() {
        let store = TokenStore::new();
        store.clear();
        assert_eq!(store.get(), None);
        store.set("tok");
        store.clear();
        assert_eq!(store.get(), None);
        assert!(!store.is_set());
    }
}
