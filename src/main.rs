// src/main.rs
use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use studio_backend::{app, config::Config, database, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let db_pool = database::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("failed to create database pool")?;
    database::run_migrations(&db_pool)
        .await
        .context("failed to run migrations")?;

    let app_state = AppState::new(db_pool, &config);

    if let Some(admin) = &config.bootstrap_admin {
        if app_state.users.ensure_admin(&admin.email, &admin.password).await? {
            tracing::info!(email = %admin.email, "bootstrap admin created");
        }
    }

    let app = app(app_state, config.cors_origin.as_deref());

    // Try port..port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => {
                    bound = Some((l, addr));
                    break;
                }
                Err(e) => {
                    if offset == 0 {
                        tracing::warn!(%addr, error = %e, "Port in use, trying next");
                    }
                }
            }
        }
        let (listener, addr) = bound.with_context(|| {
            format!("failed to bind to any port starting at {} on {}", config.port, config.host)
        })?;
        tracing::info!("Server running on {}", addr);
        listener
    };

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
