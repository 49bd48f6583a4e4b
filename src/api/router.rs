//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. Layers (outermost → innermost):
//! CORS → access log → 405 body → handler.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::db::RecordStore;

/// Build the API router around an injected record store.
pub fn api_router(store: Arc<dyn RecordStore>) -> Router {
    build_router(ApiContext::new(store))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/records",
            get(endpoints::records::list).post(endpoints::records::create),
        )
        .route(
            "/records/:id",
            get(endpoints::records::detail)
                .put(endpoints::records::update)
                .delete(endpoints::records::remove),
        )
        .with_state(ctx)
        .layer(axum::middleware::from_fn(
            middleware::method::method_not_allowed_body,
        ))
        .layer(axum::middleware::from_fn(middleware::access::log_access));

    // The data-entry form is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new().nest("/api", api).layer(cors)
}
