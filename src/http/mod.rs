//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, method dispatch)
//!     → request.rs (request ID generation)
//!     → proxy subsystem (normalize, extract, sanitize, forward)
//!     → upstream response relayed to client
//! ```

pub mod health;
pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
