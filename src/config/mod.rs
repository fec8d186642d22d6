//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → resolver.rs picks the backend origin once
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so no config file is required at all
//! - Backend origin resolution never fails: bad values fall through
//!   to the next priority source, ending at a localhost default

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use resolver::BackendOrigin;
pub use schema::ProxyConfig;
