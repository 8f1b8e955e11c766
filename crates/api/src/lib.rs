//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for authentication and the monthly cash flow
//! - Cookie-based authentication middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use fluxo_core::flow::Clock;
use fluxo_db::BudgetEntryRepository;
use fluxo_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Settings for the access token cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Cookie name.
    pub name: String,
    /// Whether the cookie is flagged `Secure`.
    pub secure: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Budget entry store shared by the flow engine.
    pub entries: Arc<BudgetEntryRepository>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Source of the current month.
    pub clock: Arc<dyn Clock>,
    /// Access token cookie settings.
    pub cookie: CookieSettings,
}

impl AppState {
    /// Builds the state, creating the budget entry store once for the process.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        jwt_service: JwtService,
        clock: Arc<dyn Clock>,
        cookie: CookieSettings,
    ) -> Self {
        let db = Arc::new(db);
        Self {
            entries: Arc::new(BudgetEntryRepository::new(Arc::clone(&db))),
            db,
            jwt_service: Arc::new(jwt_service),
            clock,
            cookie,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
