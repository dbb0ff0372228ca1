//! Route registration for the glossary gateway

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use super::handlers;
use crate::domain::Service;

/// All gateway routes, with the domain service attached as an `Extension`.
///
/// Static segments (`search`, `stream`) take priority over `{id}`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route(
            "/api/terms",
            get(handlers::list_terms).post(handlers::create_term),
        )
        .route("/api/terms/search", get(handlers::search_terms))
        .route("/api/terms/stream", get(handlers::stream_terms))
        .route(
            "/api/terms/{id}",
            get(handlers::get_term).delete(handlers::delete_term),
        )
        .layer(Extension(service))
}
