use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use aulanet::admin::AdminService;
use aulanet::config::Config;
use aulanet::http::navigator::LoggingNavigator;
use aulanet::http::ApiClient;
use aulanet::session::service::AuthService;
use aulanet::session::store::SessionStore;
use aulanet::token_store::TokenStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    let cfg = Config::from_env();
    info!(
        target: "aulanet",
        "aulanet console starting: base_url='{}', timeout={:?}, login_path='{}'",
        cfg.base_url, cfg.timeout, cfg.login_path
    );

    let tokens = Arc::new(TokenStore::new());
    let api = ApiClient::new(&cfg, tokens.clone(), Arc::new(LoggingNavigator))?;
    let service = Arc::new(AuthService::new(api.clone(), tokens.clone()));
    let store = Arc::new(SessionStore::new(service, tokens));
    let admin = AdminService::new(api);

    // A fresh process never has an access token; bootstrap settles the store
    // so the first prompt does not sit behind a loading state.
    store.bootstrap().await;

    aulanet::console::run(store, admin).await
}
