//! Fluxo API Server
//!
//! Main entry point for the Fluxo cash-flow service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fluxo_api::{AppState, CookieSettings, create_router};
use fluxo_core::flow::SystemClock;
use fluxo_db::connect_with;
use fluxo_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fluxo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.auth.secret.clone(),
        token_expires_secs: i64::try_from(config.auth.token_expiry_secs)
            .context("auth.token_expiry_secs is too large")?,
    });

    let clock = SystemClock::from_name(&config.flow.timezone)?;
    info!(timezone = %config.flow.timezone, "Flow clock configured");

    let state = AppState::new(
        db,
        jwt_service,
        Arc::new(clock),
        CookieSettings {
            name: config.auth.cookie_name.clone(),
            secure: config.auth.cookie_secure,
        },
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
