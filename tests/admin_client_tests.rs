//! Admin CRUD client tests against an in-process mock backend: filter
//! serialization, validation-body pass-through, empty-body deletes and 401
//! recovery on admin endpoints.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, RawQuery};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use aulanet::admin::{AdminService, UserFilters};
use aulanet::config::Config;
use aulanet::error::ApiError;
use aulanet::http::navigator::LoggingNavigator;
use aulanet::http::ApiClient;
use aulanet::token_store::TokenStore;

fn user_json(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "first_name": "",
        "last_name": "",
        "role": {"id": 1, "name": role},
        "is_active": true
    })
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn admin_for(addr: SocketAddr, tokens: Arc<TokenStore>) -> AdminService {
    let cfg = Config {
        base_url: format!("http://{}/api", addr),
        timeout: Duration::from_secs(5),
        login_path: "/login".to_string(),
    };
    AdminService::new(ApiClient::new(&cfg, tokens, Arc::new(LoggingNavigator)).unwrap())
}

#[tokio::test]
async fn list_serializes_filters_into_query_params() {
    let queries = Arc::new(Mutex::new(Vec::<String>::new()));
    let app = Router::new().route(
        "/api/admin/usuarios/",
        get({
            let queries = queries.clone();
            move |RawQuery(q): RawQuery| async move {
                queries.lock().push(q.unwrap_or_default());
                (
                    StatusCode::OK,
                    Json(json!({"results": [user_json(1, "ana", "Estudiante")], "count": 37})),
                )
            }
        }),
    );
    let addr = serve(app).await;

    let tokens = Arc::new(TokenStore::new());
    tokens.set("tok");
    let admin = admin_for(addr, tokens);

    let filters = UserFilters {
        search: Some("ana".into()),
        rol: Some("Estudiante".into()),
        activo: Some(true),
    };
    let page = admin.list(&filters).await.unwrap();
    assert_eq!(page.count, 37);
    assert_eq!(page.results.len(), 1);
    assert_eq!(queries.lock().as_slice(), &["search=ana&rol=Estudiante&activo=true".to_string()]);

    let page = admin.list(&UserFilters::default()).await.unwrap();
    assert_eq!(page.results[0].username, "ana");
    assert_eq!(queries.lock().last().map(String::as_str), Some(""));
}

#[tokio::test]
async fn get_update_and_partial_update_round_trip() {
    let app = Router::new()
        .route(
            "/api/admin/usuarios/{id}/",
            get(|Path(id): Path<i64>| async move {
                (StatusCode::OK, Json(user_json(id, "ana", "Estudiante")))
            })
            .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                let mut u = user_json(id, body["username"].as_str().unwrap_or("ana"), "Estudiante");
                u["email"] = body["email"].clone();
                (StatusCode::OK, Json(u))
            })
            .patch(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                let mut u = user_json(id, "ana", "Estudiante");
                if let Some(email) = body.get("email") {
                    u["email"] = email.clone();
                }
                (StatusCode::OK, Json(u))
            }),
        );
    let addr = serve(app).await;

    let tokens = Arc::new(TokenStore::new());
    tokens.set("tok");
    let admin = admin_for(addr, tokens);

    let user = admin.get(9).await.unwrap();
    assert_eq!(user.id, 9);

    let updated = admin
        .update(9, &json!({"username": "ana", "email": "new@example.com"}))
        .await
        .unwrap();
    assert_eq!(updated.email, "new@example.com");

    let patched = admin.partial_update(9, &json!({"email": "p@example.com"})).await.unwrap();
    assert_eq!(patched.email, "p@example.com");
}

#[tokio::test]
async fn create_passes_validation_body_through_unmodified() {
    let validation_body = json!({"username": ["A user with that username already exists."]});
    let app = Router::new().route(
        "/api/admin/usuarios/",
        post({
            let body = validation_body.clone();
            move || async move { (StatusCode::BAD_REQUEST, Json(body)) }
        }),
    );
    let addr = serve(app).await;

    let tokens = Arc::new(TokenStore::new());
    tokens.set("tok");
    let admin = admin_for(addr, tokens);

    let err = admin.create(&json!({"username": "ana"})).await.unwrap_err();
    match err {
        ApiError::Validation { body } => assert_eq!(body, validation_body),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn delete_accepts_empty_204_body() {
    let app = Router::new().route(
        "/api/admin/usuarios/{id}/",
        delete(|Path(_id): Path<i64>| async { StatusCode::NO_CONTENT }),
    );
    let addr = serve(app).await;

    let tokens = Arc::new(TokenStore::new());
    tokens.set("tok");
    let admin = admin_for(addr, tokens);

    admin.delete(4).await.unwrap();
}

#[tokio::test]
async fn toggle_active_and_role_catalog() {
    let app = Router::new()
        .route(
            "/api/admin/usuarios/{id}/toggle-activo/",
            post(|Path(_id): Path<i64>| async {
                (StatusCode::OK, Json(json!({"is_active": false, "message": "user deactivated"})))
            }),
        )
        .route(
            "/api/admin/usuarios/roles/",
            get(|| async {
                (
                    StatusCode::OK,
                    Json(json!([
                        {"id": 1, "name": "Admin"},
                        {"id": 2, "name": "Estudiante"},
                        {"id": 3, "name": "Empresa"}
                    ])),
                )
            }),
        );
    let addr = serve(app).await;

    let tokens = Arc::new(TokenStore::new());
    tokens.set("tok");
    let admin = admin_for(addr, tokens);

    let out = admin.toggle_active(2).await.unwrap();
    assert!(!out.is_active);
    assert_eq!(out.message, "user deactivated");

    let roles = admin.roles().await.unwrap();
    assert_eq!(roles.len(), 3);
    assert_eq!(roles[1].name, "Estudiante");
}

#[tokio::test]
async fn admin_calls_recover_from_401_like_any_other_request() {
    let refresh_hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/api/admin/usuarios/",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("");
                if auth == "Bearer fresh" {
                    (StatusCode::OK, Json(json!({"results": [], "count": 0})))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "expired"})))
                }
            }),
        )
        .route(
            "/api/auth/refresh/",
            post({
                let refresh_hits = refresh_hits.clone();
                move || async move {
                    refresh_hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::OK, Json(json!({"access": "fresh"})))
                }
            }),
        );
    let addr = serve(app).await;

    let tokens = Arc::new(TokenStore::new());
    tokens.set("stale");
    let admin = admin_for(addr, tokens.clone());

    let page = admin.list(&UserFilters::default()).await.unwrap();
    assert_eq!(page.count, 0);
    assert_eq!(refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(tokens.get(), Some("fresh".to_string()));
}
