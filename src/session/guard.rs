//! Route guard: a pure decision over session state and a route's allowed
//! roles. While the store is loading the guard renders a neutral pending
//! state rather than committing to a redirect (avoids the flicker-redirect on
//! reload); unauthenticated users go to the login entry point; a user whose
//! role is not admitted is sent to their own dashboard. Admin passes every
//! role gate.

use tracing::warn;

use crate::session::models::Role;
use crate::session::store::SessionState;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Bootstrap has not settled; render a neutral pending state.
    Pending,
    Redirect(String),
    Admit,
}

pub fn decide(state: &SessionState, allowed_roles: &[Role]) -> RouteDecision {
    decide_with_redirect(state, allowed_roles, LOGIN_PATH)
}

pub fn decide_with_redirect(
    state: &SessionState,
    allowed_roles: &[Role],
    login_path: &str,
) -> RouteDecision {
    if state.loading {
        return RouteDecision::Pending;
    }
    let Some(user) = &state.user else {
        return RouteDecision::Redirect(login_path.to_string());
    };
    if allowed_roles.is_empty() {
        return RouteDecision::Admit;
    }
    match user.role() {
        // Admin is implicitly admitted wherever another role is checked.
        Some(Role::Admin) => RouteDecision::Admit,
        Some(role) if allowed_roles.contains(&role) => RouteDecision::Admit,
        Some(role) => {
            warn!(
                target: "session",
                "access denied: role {} not in {:?}, redirecting to own dashboard",
                role.as_str(),
                allowed_roles
            );
            RouteDecision::Redirect(role.dashboard_path().to_string())
        }
        None => {
            warn!(target: "session", "unknown role {:?}, redirecting home", user.role.name);
            RouteDecision::Redirect("/".to_string())
        }
    }
}

/// The route surface exposed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    About,
    Login,
    Dashboard(Role),
}

impl AppRoute {
    pub fn path(&self) -> &'static str {
        match self {
            AppRoute::Home => "/",
            AppRoute::About => "/about",
            AppRoute::Login => "/login",
            AppRoute::Dashboard(role) => role.dashboard_path(),
        }
    }

    /// Resolve a requested path; anything unknown falls back to home.
    pub fn resolve(path: &str) -> AppRoute {
        match path {
            "/" => AppRoute::Home,
            "/about" => AppRoute::About,
            "/login" => AppRoute::Login,
            "/dashboard/admin" => AppRoute::Dashboard(Role::Admin),
            "/dashboard/estudiante" => AppRoute::Dashboard(Role::Estudiante),
            "/dashboard/empresa" => AppRoute::Dashboard(Role::Empresa),
            _ => AppRoute::Home,
        }
    }

    /// Roles admitted to the route; empty means any authenticated or
    /// anonymous visitor. Admin is covered implicitly by the guard.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            AppRoute::Home | AppRoute::About | AppRoute::Login => &[],
            AppRoute::Dashboard(Role::Admin) => &[Role::Admin],
            AppRoute::Dashboard(Role::Estudiante) => &[Role::Estudiante],
            AppRoute::Dashboard(Role::Empresa) => &[Role::Empresa],
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod guard_tests;
