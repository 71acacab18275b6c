//! Session domain models: roles and the user profile snapshot.

use serde::{Deserialize, Serialize};

/// Platform roles. `Admin` is a superset: every gate that admits another role
/// also admits `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Estudiante,
    Empresa,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Estudiante => "Estudiante",
            Role::Empresa => "Empresa",
        }
    }

    /// Parse the `role.name` tag carried on a user profile. Unknown names
    /// yield `None` rather than failing deserialization.
    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "Admin" => Some(Role::Admin),
            "Estudiante" => Some(Role::Estudiante),
            "Empresa" => Some(Role::Empresa),
            _ => None,
        }
    }

    /// The role's own default dashboard route.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboard/admin",
            Role::Estudiante => "/dashboard/estudiante",
            Role::Empresa => "/dashboard/empresa",
        }
    }
}

/// Role reference as the backend serializes it on users and in the role
/// catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

/// Immutable profile snapshot, replaced wholesale on each successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// The backend still emits this under its legacy field name.
    #[serde(alias = "rol_usuario")]
    pub role: RoleRef,
    #[serde(default)]
    pub is_active: bool,
}

impl UserProfile {
    pub fn role(&self) -> Option<Role> {
        Role::from_name(&self.role.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_round_trip_and_dashboards() {
        for role in [Role::Admin, Role::Estudiante, Role::Empresa] {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_name("Profesor"), None);
        assert_eq!(Role::Estudiante.dashboard_path(), "/dashboard/estudiante");
    }

    #[test]
    fn profile_accepts_legacy_role_field() {
        let v = json!({
            "id": 7,
            "username": "maria",
            "email": "maria@example.com",
            "first_name": "María",
            "last_name": "García",
            "rol_usuario": {"id": 2, "name": "Estudiante"},
            "is_active": true
        });
        let user: UserProfile = serde_json::from_value(v).unwrap();
        assert_eq!(user.role.name, "Estudiante");
        assert_eq!(user.role(), Some(Role::Estudiante));

        let v2 = json!({
            "id": 1,
            "username": "admin",
            "role": {"name": "Admin"},
            "is_active": true
        });
        let admin: UserProfile = serde_json::from_value(v2).unwrap();
        assert_eq!(admin.role(), Some(Role::Admin));
        assert_eq!(admin.email, "");
    }
}
