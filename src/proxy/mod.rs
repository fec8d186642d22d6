//! Request proxying subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request (under /api)
//!     → rules.rs (trailing-slash normalization of the backend path)
//!     → body.rs (content-type driven payload extraction)
//!     → headers.rs (hop-by-hop / framing header sanitization)
//!     → forward.rs (upstream call, verbatim response relay)
//! ```
//!
//! # Design Decisions
//! - The proxy is a transparent pass-through: no retries, no response
//!   reinterpretation, any upstream status is relayed unchanged
//! - Transport failures surface as `ProxyError`; the HTTP layer maps
//!   them to a 5xx, never to a fabricated success
//! - The upstream client follows no redirects: a backend trailing-slash
//!   redirect must reach the browser, not be chased here

use std::sync::Arc;

use thiserror::Error;

use crate::config::resolver::{self, BackendOrigin};
use crate::config::schema::ProxyConfig;
use crate::proxy::rules::PathRules;

pub mod body;
pub mod forward;
pub mod headers;
pub mod rules;

pub use body::Payload;

/// Error type for a single proxied exchange.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream call itself failed (connect, DNS, TLS, aborted read).
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The inbound body could not be read.
    #[error("failed to read request body: {0}")]
    BodyRead(#[from] axum::Error),

    /// The inbound multipart body was malformed.
    #[error("malformed multipart body: {0}")]
    Multipart(String),
}

/// Immutable per-process proxy state, shared across requests.
pub struct ProxyContext {
    /// Upstream origin, resolved once at startup.
    pub origin: BackendOrigin,

    /// Trailing-slash rule tables.
    pub rules: PathRules,

    /// Upstream HTTP client.
    pub client: reqwest::Client,

    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl ProxyContext {
    /// Build the proxy context from validated configuration.
    pub fn new(config: &ProxyConfig) -> Result<Arc<Self>, reqwest::Error> {
        let origin = resolver::resolve(&config.backend);
        tracing::info!(origin = %origin, "backend origin resolved");

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Arc::new(Self {
            origin,
            rules: PathRules::from_config(&config.rules),
            client,
            max_body_bytes: config.limits.max_body_bytes,
        }))
    }
}
