//! Martabak storefront library.
//!
//! This crate provides the storefront as a library so the router can be
//! built by the binary and by integration tests alike.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

use std::path::Path;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Static assets served under `/static`, relative to the crate root.
const STATIC_DIR: &str = "static";

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are not included; the binary adds them outermost.
pub fn app(state: AppState) -> Router {
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(STATIC_DIR);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        // Layers run bottom-up: the last one added sees the request first.
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span::<axum::body::Body>))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. There are no dependencies to check.
async fn health() -> &'static str {
    "ok"
}
