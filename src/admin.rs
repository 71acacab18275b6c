//! Admin user-management client: list/search, CRUD, activation toggle and
//! the role catalog, all over `/admin/usuarios/`. Requests go through the
//! shared `ApiClient`, so bearer attachment and 401 recovery apply here too.
//! Backend validation bodies pass through unmodified for UI display.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::session::models::{RoleRef, UserProfile};

/// Optional list filters; only set fields become query parameters.
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub search: Option<String>,
    pub rol: Option<String>,
    pub activo: Option<bool>,
}

impl UserFilters {
    fn query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(search) = &self.search {
            params.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(rol) = &self.rol {
            params.push(format!("rol={}", urlencoding::encode(rol)));
        }
        if let Some(activo) = self.activo {
            params.push(format!("activo={}", activo));
        }
        params.join("&")
    }
}

/// One page of the paginated user list.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub results: Vec<UserProfile>,
    pub count: u64,
}

/// Outcome of the activation toggle endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleOutcome {
    pub is_active: bool,
    #[serde(default)]
    pub message: String,
}

pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &UserFilters) -> ApiResult<UserPage> {
        let qs = filters.query_string();
        let path = if qs.is_empty() {
            "/admin/usuarios/".to_string()
        } else {
            format!("/admin/usuarios/?{}", qs)
        };
        let v = self.api.get(&path).await?;
        decode(v)
    }

    pub async fn get(&self, id: i64) -> ApiResult<UserProfile> {
        let v = self.api.get(&format!("/admin/usuarios/{}/", id)).await?;
        decode(v)
    }

    pub async fn create(&self, user: &Value) -> ApiResult<UserProfile> {
        let v = self.api.post("/admin/usuarios/", Some(user)).await?;
        decode(v)
    }

    /// Full replacement (PUT).
    pub async fn update(&self, id: i64, user: &Value) -> ApiResult<UserProfile> {
        let v = self.api.put(&format!("/admin/usuarios/{}/", id), user).await?;
        decode(v)
    }

    /// Partial update (PATCH); sends only the changed fields.
    pub async fn partial_update(&self, id: i64, fields: &Value) -> ApiResult<UserProfile> {
        let v = self.api.patch(&format!("/admin/usuarios/{}/", id), fields).await?;
        decode(v)
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.api.delete(&format!("/admin/usuarios/{}/", id)).await?;
        Ok(())
    }

    /// Flip the active flag without sending the whole user.
    pub async fn toggle_active(&self, id: i64) -> ApiResult<ToggleOutcome> {
        let v = self
            .api
            .post(&format!("/admin/usuarios/{}/toggle-activo/", id), None)
            .await?;
        decode(v)
    }

    /// Role catalog, for form selects.
    pub async fn roles(&self) -> ApiResult<Vec<RoleRef>> {
        let v = self.api.get("/admin/usuarios/roles/").await?;
        decode(v)
    }
}

fn decode<T: serde::de::DeserializeOwned>(v: Value) -> ApiResult<T> {
    serde_json::from_value(v).map_err(|e| ApiError::decode(format!("bad response payload: {}", e)))
}
