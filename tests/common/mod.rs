//! Shared utilities for integration testing.
//!
//! Starts a recording mock backend and a real proxy instance on
//! ephemeral ports, so tests can assert exactly what reaches upstream.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;

use edge_proxy::{HttpServer, ProxyConfig};

/// One request as observed by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Shared log of requests received by the mock backend.
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn last(&self) -> RecordedRequest {
        self.inner
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request reached the mock backend")
    }
}

#[derive(Clone)]
struct UpstreamState {
    recorder: Recorder,
    status: StatusCode,
    body: &'static str,
}

/// Start a mock backend that records every request and answers with a
/// fixed status and body.
pub async fn start_upstream(status: StatusCode, body: &'static str) -> (SocketAddr, Recorder) {
    let recorder = Recorder::default();
    let state = UpstreamState {
        recorder: recorder.clone(),
        status,
        body,
    };
    let app = Router::new().fallback(record).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorder)
}

async fn record(State(state): State<UpstreamState>, request: Request<Body>) -> impl IntoResponse {
    let method = request.method().to_string();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_default();
    let headers = request.headers().clone();
    let body = to_bytes(request.into_body(), usize::MAX).await.unwrap();

    state.recorder.inner.lock().unwrap().push(RecordedRequest {
        method,
        path_and_query,
        headers,
        body: body.to_vec(),
    });
    (state.status, state.body)
}

/// Start the proxy pointed at the given upstream, returning its address.
pub async fn start_proxy(upstream: SocketAddr) -> SocketAddr {
    let mut config = ProxyConfig::default();
    config.backend.override_url = Some(format!("http://{upstream}"));
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(&config).unwrap();
    tokio::spawn(async move {
        server.run(listener).await.unwrap();
    });
    addr
}
