//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    // Configure CORS for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/api/status", get(handlers::get_status))
        // Cosigners
        .route(
            "/api/cosigners",
            get(handlers::list_cosigners)
                .post(handlers::add_cosigner)
                .delete(handlers::wipe_cosigners),
        )
        // Wallet
        .route(
            "/api/wallet",
            get(handlers::get_wallet)
                .post(handlers::create_wallet)
                .delete(handlers::wipe_wallet),
        )
        .route("/api/wallet/preview", get(handlers::preview_wallet))
        // Key export and disclosure
        .route("/api/export", get(handlers::export_key))
        .route("/api/mnemonic/reveal", post(handlers::reveal_mnemonic))
        .with_state(state)
        .layer(cors)
}
