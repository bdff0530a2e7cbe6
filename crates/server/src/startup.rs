use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Build the application for a resolved config: record store plus router.
pub async fn app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let repo = service::runtime::build_repository(cfg)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(routes::build_router(AppState::new(repo), build_cors()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl_c listener failed");
    }
    info!("shutdown signal received");
}

/// Public entry: load config, build the app and serve until Ctrl+C.
///
/// The caller owns process setup (`.env` loading, tracing subscriber).
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let app = app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = ?cfg.storage_backend(), "starting student registry");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
