//! Hard-navigation seam.
//! A forced full-page navigation is a different side effect from in-app
//! routing: it restarts the client process, which is what actually wipes all
//! in-memory state (token store included) on logout or session expiry. The
//! HTTP client is the only caller.

use tracing::warn;

pub trait Navigator: Send + Sync {
    fn hard_redirect(&self, path: &str);
}

/// Default navigator for headless hosts: logs the forced navigation and does
/// nothing else. Embedders wire their own implementation.
#[derive(Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn hard_redirect(&self, path: &str) {
        warn!(target: "session", "forced navigation to {}", path);
    }
}
