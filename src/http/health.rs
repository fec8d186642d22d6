//! Edge health endpoint.
//!
//! Reports the proxy's own liveness and probes the backend so that
//! monitoring sees backend outages at the edge. Returns 503 when the
//! backend is unreachable or reports itself unhealthy.

use std::time::Instant;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::http::server::AppState;

pub async fn health(State(state): State<AppState>) -> Response {
    let start = Instant::now();

    let probe_url = format!("{}/health", state.proxy.origin.as_str());
    let backend = match state
        .proxy
        .client
        .get(probe_url.as_str())
        .timeout(state.probe_timeout)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => "healthy",
        Ok(_) => "unhealthy",
        Err(error) => {
            tracing::warn!(error = %error, url = %probe_url, "backend health probe failed");
            "unreachable"
        }
    };

    let status = if backend == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if backend == "healthy" { "healthy" } else { "degraded" },
        "backend": backend,
        "version": env!("CARGO_PKG_VERSION"),
        "response_time_ms": start.elapsed().as_millis() as u64,
    });

    (
        status,
        [(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")],
        Json(body),
    )
        .into_response()
}
