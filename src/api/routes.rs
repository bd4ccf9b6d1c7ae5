//! HTTP API route definitions.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    admin_import, admin_payments, admin_stats, create_checkout_session, save_payment, AppState,
};

/// Create the API router. Non-API GET requests fall through to the static
/// site directory; every response carries permissive CORS headers.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        // Purchase flow
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/save-payment", post(save_payment))
        // Admin dashboard
        .route("/admin/payments", get(admin_payments))
        .route("/admin/stats", get(admin_stats))
        .route("/admin/import", post(admin_import))
        // Static site fallback
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
