// src/server/mod.rs
// HTTP surface:
// - GET  /api/status                                     - health check
// - POST /api/sessions                                   - open a session
// - POST /api/sessions/{id}/reset                        - discard session state
// - POST /api/sessions/{id}/recommend                    - SSE initial round
// - POST /api/sessions/{id}/feedback                     - SSE revision round
// - POST /api/sessions/{id}/abort                        - cancel the live round
// - GET  /api/sessions/{id}/versions                     - list versions + pointer
// - POST /api/sessions/{id}/versions/{version_id}/select - move the pointer
// - GET  /api/sessions/{id}/export                       - download current plan
// - GET  /api/products, /api/cases                       - public knowledge pages
// - /api/admin/*                                         - token-gated catalog CRUD

mod admin;
mod handlers;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::state::AppState;

pub fn create_router(state: AppState, cors_origin: &str) -> Router {
    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        CorsLayer::new()
            .allow_origin(
                cors_origin
                    .parse::<HeaderValue>()
                    .unwrap_or_else(|_| HeaderValue::from_static("*")),
            )
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .route("/api/status", get(handlers::status_handler))
        .route("/api/sessions", post(handlers::create_session_handler))
        .route("/api/sessions/{id}/reset", post(handlers::reset_session_handler))
        .route("/api/sessions/{id}/recommend", post(handlers::recommend_handler))
        .route("/api/sessions/{id}/feedback", post(handlers::feedback_handler))
        .route("/api/sessions/{id}/abort", post(handlers::abort_handler))
        .route("/api/sessions/{id}/versions", get(handlers::versions_handler))
        .route(
            "/api/sessions/{id}/versions/{version_id}/select",
            post(handlers::select_version_handler),
        )
        .route("/api/sessions/{id}/export", get(handlers::export_handler))
        .route("/api/products", get(handlers::products_handler))
        .route("/api/cases", get(handlers::cases_handler))
        .route("/api/admin/login", post(admin::login_handler))
        .route("/api/admin/products", post(admin::add_product_handler))
        .route("/api/admin/products/{id}", put(admin::update_product_handler))
        .route("/api/admin/products/{id}", delete(admin::delete_product_handler))
        .route("/api/admin/cases", post(admin::add_case_handler))
        .route("/api/admin/cases/{id}", put(admin::update_case_handler))
        .route("/api/admin/cases/{id}", delete(admin::delete_case_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(state: AppState, host: &str, port: u16, cors_origin: &str) -> Result<()> {
    let app = create_router(state, cors_origin);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
