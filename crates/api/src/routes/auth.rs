//! Authentication routes for register, login, and logout.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::{error, info};
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};
use fluxo_core::auth::{hash_password, verify_password_or_dummy};
use fluxo_db::{UserError, UserRepository};
use fluxo_shared::{
    AppError,
    auth::{LoginRequest, RegisterRequest, UserInfo},
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Authenticated user.
    pub user: UserInfo,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

fn internal(context: &str, err: &impl std::fmt::Display) -> ApiError {
    error!(error = %err, "{context}");
    ApiError(AppError::Internal(context.to_string()))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    let password_hash =
        hash_password(&payload.password).map_err(|e| internal("Failed to hash password", &e))?;

    let user_repo = UserRepository::new(Arc::clone(&state.db));
    let user = user_repo
        .create(&payload.email, &password_hash, payload.full_name.trim())
        .await
        .map_err(|e| match e {
            UserError::EmailTaken => {
                ApiError(AppError::Conflict("Email already registered".to_string()))
            }
            UserError::Database(db) => ApiError(AppError::Database(db.to_string())),
        })?;

    info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }),
    ))
}

/// POST /auth/login - Authenticate and set the access token cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    let user_repo = UserRepository::new(Arc::clone(&state.db));
    let user = user_repo
        .find_by_email(&payload.email)
        .await
        .map_err(|e| ApiError(AppError::Database(e.to_string())))?;

    let hash = user.as_ref().map(|u| u.password_hash.as_str());
    let verified = verify_password_or_dummy(&payload.password, hash);

    let Some(user) = user.filter(|_| verified) else {
        info!("Failed login attempt");
        return Err(ApiError(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        )));
    };

    let token = state
        .jwt_service
        .generate_token(user.id, &user.email)
        .map_err(|e| internal("Failed to generate access token", &e))?;

    let cookie = Cookie::build((state.cookie.name.clone(), token))
        .http_only(true)
        .secure(state.cookie.secure)
        .same_site(SameSite::Lax)
        .path("/");

    info!(user_id = user.id, "User logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user: UserInfo {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
            },
            expires_in: state.jwt_service.token_expires_in(),
        }),
    ))
}

/// POST /auth/logout - Clear the access token cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build((state.cookie.name.clone(), "")).path("/"));
    (StatusCode::NO_CONTENT, jar)
}
