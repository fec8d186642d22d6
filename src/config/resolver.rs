//! Backend origin resolution.
//!
//! # Responsibilities
//! - Pick the upstream origin from layered sources, in priority order:
//!   explicit override → public API base → localhost default
//! - Tolerate a public API base given as a JSON array of URLs
//!   (a common misconfiguration when a multi-environment list is
//!   supplied without narrowing)
//! - Force https on the public API base in production
//!
//! # Design Decisions
//! - Resolution never fails: a missing or malformed value silently
//!   falls through to the next source. Bad config must not 500.
//! - Resolved once at startup; the result is immutable and shared
//!   by Arc, so no synchronization is needed.

use url::Url;

use crate::config::schema::BackendConfig;

/// Fallback origin when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/v1";

/// The resolved upstream origin, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOrigin(String);

impl BackendOrigin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BackendOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the backend origin from the configured sources.
pub fn resolve(backend: &BackendConfig) -> BackendOrigin {
    if let Some(raw) = non_empty(backend.override_url.as_deref()) {
        match checked(raw) {
            Some(origin) => return BackendOrigin(origin),
            None => tracing::warn!(value = raw, "ignoring malformed backend override"),
        }
    }

    if let Some(raw) = non_empty(backend.api_base.as_deref()) {
        let mut candidate = first_from_json_array(raw).unwrap_or_else(|| raw.to_string());
        if backend.environment == "production" {
            candidate = force_https(&candidate);
        }
        match checked(&candidate) {
            Some(origin) => return BackendOrigin(origin),
            None => tracing::warn!(value = %candidate, "ignoring malformed api_base"),
        }
    }

    BackendOrigin(DEFAULT_BACKEND_URL.to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accept a candidate only if it parses as an absolute URL; strip any
/// trailing slash so path concatenation never produces a double slash.
fn checked(raw: &str) -> Option<String> {
    Url::parse(raw).ok()?;
    Some(raw.trim_end_matches('/').to_string())
}

/// If the value parses as a non-empty JSON array, use its first element.
fn first_from_json_array(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let first = value.as_array()?.first()?;
    Some(match first {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Rewrite the scheme to https. Mixed content is blocked by browsers, so
/// a production deployment must never call the backend over plain http.
fn force_https(raw: &str) -> String {
    match raw.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => raw.to_string(),
    }
}
