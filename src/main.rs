use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use uaifood_admin::config::config;
use uaifood_admin::is_production;
use uaifood_admin::routes::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, API_BASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("uaifood_admin=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting UaiFood Admin in {:?} mode", config.environment);

    if config.session.jwt_secret.is_empty() {
        if is_production!() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        tracing::warn!("JWT_SECRET is not set; every session will resolve as anonymous");
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("UaiFood Admin listening on http://{}", bind_addr);

    axum::serve(listener, app(Arc::new(config.clone())))
        .await
        .context("server error")?;

    Ok(())
}
