use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use shambaeye_admin::api::router::api_router;
use shambaeye_admin::api::types::ApiContext;
use shambaeye_admin::config::{self, Config};
use shambaeye_admin::store::auth::IdentityClient;
use shambaeye_admin::store::firestore::Firestore;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    // Credentials are required before anything is served.
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(%err, "configuration error");
            std::process::exit(1);
        }
    };

    tracing::info!(
        project_id = %cfg.project_id,
        "{} backend starting v{}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let store = Arc::new(Firestore::new(&cfg.project_id, &cfg.api_key));
    let auth = Arc::new(IdentityClient::new(&cfg.api_key));
    let ctx = ApiContext::new(store, auth, cfg.default_user_password.clone());

    let app = api_router(ctx);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, "listening");
    axum::serve(listener, app).await
}
