//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the proxy catch-all and health routes
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind the server to a listener
//! - Dispatch requests into the proxy subsystem
//! - Record per-request metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::health;
use crate::http::request::UuidRequestId;
use crate::observability::metrics;
use crate::proxy::{forward, ProxyContext, ProxyError};

/// All backend paths live under this prefix on the edge.
pub const PROXY_PREFIX: &str = "/api";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyContext>,
    pub probe_timeout: Duration,
}

/// HTTP server for the edge proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let state = AppState {
            proxy: ProxyContext::new(config)?,
            probe_timeout: Duration::from_secs(config.timeouts.health_probe_secs),
        };
        Ok(Self {
            router: Self::build_router(config, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health::health))
            .route("/api", any(proxy_handler))
            .route("/api/", any(proxy_handler))
            .route("/api/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler: strips the proxy prefix and hands the request to
/// the dispatcher. Upstream statuses pass through untouched; only a
/// transport-level failure produces a proxy-generated status.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    if !is_proxied_method(&method) {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let rel_path = request
        .uri()
        .path()
        .strip_prefix(PROXY_PREFIX)
        .unwrap_or("")
        .trim_start_matches('/')
        .to_string();

    let response = match forward::dispatch(&state.proxy, &rel_path, request).await {
        Ok(response) => response.into_response(),
        Err(error) => {
            tracing::error!(method = %method, path = %rel_path, error = %error, "proxy dispatch failed");
            error.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

fn is_proxied_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    )
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            // The backend could not be reached at all; never fabricate
            // a success-shaped response for this.
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::BodyRead(_) | ProxyError::Multipart(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_five_backend_verbs_are_proxied() {
        for method in [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ] {
            assert!(is_proxied_method(&method));
        }
        assert!(!is_proxied_method(&Method::HEAD));
        assert!(!is_proxied_method(&Method::OPTIONS));
    }
}
