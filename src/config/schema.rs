//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend origin sources, in priority order.
    pub backend: BackendConfig,

    /// Trailing-slash rule tables for path normalization.
    pub rules: RulesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request body limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Backend origin configuration.
///
/// Resolution priority: `override_url` → `api_base` → hard-coded default.
/// The corresponding environment variables (`BACKEND_URL`, `PUBLIC_API_BASE`,
/// `APP_ENV`) take precedence over file values; see `loader`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BackendConfig {
    /// Explicit backend origin override. Used verbatim when set.
    pub override_url: Option<String>,

    /// Public API base. Either a plain URL or a JSON array of URLs,
    /// in which case the first element is used.
    pub api_base: Option<String>,

    /// Deployment environment indicator. When "production", the public
    /// API base is forced to https to avoid mixed content.
    pub environment: String,
}

/// Trailing-slash rule tables.
///
/// These encode the backend's routing conventions: collection endpoints
/// require a trailing slash, action and item endpoints reject one. They
/// must be kept in sync with the backend's actual routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Exact paths that must never carry a trailing slash.
    pub no_slash: Vec<String>,

    /// Exact base paths (collections) that must carry a trailing slash.
    pub slash: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            no_slash: vec![
                "auth/login".to_string(),
                "auth/register".to_string(),
                "auth/refresh".to_string(),
                "auth/me".to_string(),
                "transcriptions/upload".to_string(),
                "texts/normalize".to_string(),
                "texts/extract".to_string(),
                "texts/compare".to_string(),
                "texts/export/docx".to_string(),
            ],
            slash: vec!["transcriptions".to_string()],
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Overall inbound request timeout in seconds.
    pub request_secs: u64,

    /// Timeout for the health endpoint's backend probe, in seconds.
    pub health_probe_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            health_probe_secs: 5,
        }
    }
}

/// Request body limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            // Audio uploads are the largest payloads the proxy carries.
            max_body_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics exporter.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
