//! Authenticated-session subsystem: domain models, the auth service, the
//! observable session store and the route guard.

pub mod guard;
pub mod models;
pub mod service;
pub mod store;

pub use guard::{decide, AppRoute, RouteDecision};
pub use models::{Role, RoleRef, UserProfile};
pub use service::AuthService;
pub use store::{SessionState, SessionStore};
