//! Authentication API endpoints
//!
//! Provides registration, login, and user info endpoints for JWT-based
//! authentication.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::user::RegisterUserRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            email: user.email().to_string(),
            name: user.name().map(String::from),
            nickname: user.nickname().map(String::from),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Register a new user account
///
/// POST /auth/register
///
/// Returns a JWT token alongside the new user so the client can proceed
/// without a separate login call.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: request.email,
            password: request.password,
            name: request.name,
            nickname: request.nickname,
            phone_number: request.phone_number,
            country_code: request.country_code,
        })
        .await?;

    let token = state
        .jwt_service
        .generate(&user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from_user(&user),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Login with email and password
///
/// POST /auth/login
///
/// Returns a JWT token on successful authentication.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let token = state
        .jwt_service
        .generate(&user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from_user(&user),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Get current authenticated user
///
/// GET /auth/me
pub async fn get_current_user(
    RequireUser(user): RequireUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from_user(&user)))
}
