//! Edge proxy for the transcription backend API.
//!
//! Sits between the browser and the backend HTTP service: normalizes
//! trailing-slash path conventions, relays request bodies by content type,
//! sanitizes headers across the trust boundary, and passes upstream
//! responses back unchanged.

pub mod config;
pub mod http;
pub mod observability;
pub mod proxy;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use proxy::ProxyContext;
