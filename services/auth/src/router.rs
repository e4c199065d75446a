use axum::{Router, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use nutrack_core::health::{healthz, readyz};
use nutrack_core::middleware::request_id_layer;

use crate::handlers::{
    credentials::{login, register},
    password::{forgot_password, reset_password},
    social::{apple_login, google_login},
    token::{logout, refresh},
};
use crate::state::AppState;

/// Build the HTTP surface.
///
/// Rate limiting is enforced by the edge proxy in front of this service
/// (register 5/15min, login and social 10/min, forgot-password 3/15min,
/// reset-password 5/60min); refresh and logout are unthrottled at that layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Credentials
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        // Social login
        .route("/auth/google", post(google_login))
        .route("/auth/apple", post(apple_login))
        // Session lifecycle
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        // Password reset
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
