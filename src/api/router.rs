use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::state::AppState;
use super::teams;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Authentication endpoints (no auth required for register/login)
        .nest("/auth", auth::create_auth_router())
        // Team registry, roster and invitation workflow
        .nest("/teams", teams::create_teams_router())
        // axum 0.8 nesting does not treat `/teams/` as `/teams`; the spec
        // declares the trailing-slash form, so register it explicitly
        .route("/teams/", post(teams::create_team))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
