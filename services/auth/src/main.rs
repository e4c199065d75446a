use sea_orm::Database;
use tracing::info;

use nutrack_auth::config::AuthConfig;
use nutrack_auth::router::build_router;
use nutrack_auth::state::AppState;
use nutrack_core::config::Config as _;
use nutrack_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http = reqwest::Client::new();

    let state = AppState {
        db,
        http,
        jwt_secret: config.jwt_secret,
        google_client_id: config.google_client_id,
        apple_client_id: config.apple_client_id,
        revoke_all_on_token_reuse: config.revoke_all_on_token_reuse,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
