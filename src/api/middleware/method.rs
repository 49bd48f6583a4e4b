//! Gives the router's bare 405 responses the same `{ "error": ... }` body
//! as every other failure.

use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::ErrorBody;

pub async fn method_not_allowed_body(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rejected = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: format!("Method {method} not allowed"),
        }),
    )
        .into_response();
    if let Some(allow) = allow {
        rejected.headers_mut().insert(header::ALLOW, allow);
    }
    rejected
}
