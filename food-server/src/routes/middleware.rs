//! Access log

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// One line per finished request: id, method, route template, status and
/// latency. 4xx and 5xx responses log at `warn`.
///
/// Runs inside `SetRequestIdLayer`, so `x-request-id` is normally present.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let method = req.method().clone();
    let route = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    };

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    if status >= 400 {
        tracing::warn!(%request_id, %method, %route, status, latency_ms, "request failed");
    } else {
        tracing::info!(%request_id, %method, %route, status, latency_ms, "request served");
    }

    response
}
