use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::auth::{service::AuthConfig, TokenIssuer};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `config.toml` when present, otherwise defaults plus environment variables.
pub fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(file_err) => {
            warn!(error = %file_err, "config.toml unusable, falling back to environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> auth::ServerState {
    auth::ServerState {
        db,
        auth: auth::ServerAuthConfig {
            tokens: TokenIssuer::from_config(&cfg.auth),
            settings: AuthConfig::from(&cfg.auth),
        },
    }
}

/// Router with the production CORS policy.
pub fn app(state: auth::ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining in-flight requests");
}

/// Serve until `shutdown` resolves, then let open requests finish.
pub async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Connect, migrate when configured, and serve until a shutdown signal.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
    let db = if cfg.server.migrate_on_start {
        models::db::connect_and_migrate(&db_cfg).await
    } else {
        models::db::connect_with_config(&db_cfg).await
    }
    .map_err(|e| StartupError::Database(e.to_string()))?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| StartupError::InvalidConfig(e.to_string()))?;

    let app = app(build_state(db, &cfg));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, issuer = %cfg.auth.issuer, "poseidon api listening");
    serve_until(listener, app, shutdown_signal()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serve_returns_once_shutdown_resolves() -> anyhow::Result<()> {
        let db = models::db::connect_memory().await?;
        let mut cfg = AppConfig::default();
        cfg.auth.jwt_secret = "startup-test-secret-0123456789".into();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        serve_until(listener, app(build_state(db, &cfg)), async {}).await
    }
}
