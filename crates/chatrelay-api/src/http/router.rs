//! Axum router configuration with middleware.
//!
//! Routes: `POST /chat`; everything else (including `GET /chat`) answers
//! `200 OK`. `OPTIONS` on any path is answered by the CORS layer as a
//! preflight without reaching a handler. Request bodies are unbounded here;
//! oversized messages are truncated by the session manager.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method};
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::handlers::chat::SESSION_HEADER;
use crate::state::AppState;

/// Build the relay router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .route(
            "/chat",
            post(handlers::chat::chat).fallback(handlers::ok),
        )
        .fallback(handlers::ok)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
