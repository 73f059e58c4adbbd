use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>, frontend_dir: &str) -> Router {
    Router::new()
        // Switch inventory routes
        .route("/api/switches", get(handlers::switches::list_switches))
        .route("/api/switches", post(handlers::switches::create_switch))
        .route("/api/switches/:address", delete(handlers::switches::delete_switch))
        .route("/api/switches/:address/test", get(handlers::switches::test_switch))
        .route(
            "/api/switches/:address/cleanup-sessions",
            post(handlers::switches::cleanup_sessions),
        )
        // VLAN routes (live reads/writes against the switch)
        .route("/api/vlans", get(handlers::vlans::list_vlans))
        .route("/api/vlans", post(handlers::vlans::create_vlan))
        .route("/api/vlans/:id", delete(handlers::vlans::delete_vlan))
        // Interface routes
        .route("/api/interfaces", get(handlers::interfaces::list_interfaces))
        .route("/api/interfaces", patch(handlers::interfaces::patch_interface))
        // Status route
        .route("/api/status", get(handlers::system::get_status))
        // Static files (dashboard frontend)
        .nest_service("/assets", ServeDir::new(format!("{}/assets", frontend_dir)))
        .fallback_service(ServeDir::new(frontend_dir).fallback(
            tower_http::services::ServeFile::new(format!("{}/index.html", frontend_dir)),
        ))
        // Add state and middleware
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
