//! Upstream dispatch and response relay.
//!
//! # Responsibilities
//! - Compute the destination URL (origin + normalized path + raw query)
//! - Extract the payload for body-bearing verbs
//! - Issue the upstream call with sanitized headers
//! - Relay status, headers, and body back unchanged
//!
//! # Design Decisions
//! - GET and DELETE never read the inbound body
//! - The upstream body is read fully before relaying; only the framing
//!   headers (`transfer-encoding`, `connection`) are dropped from the
//!   relayed response, since the body is re-framed as a sized body
//! - No retries and no added timeouts: backend unavailability must
//!   surface, not hide behind a success-shaped substitute

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{CONNECTION, TRANSFER_ENCODING};
use axum::http::{Method, Response};

use crate::proxy::body::{self, FormPart, Payload};
use crate::proxy::headers;
use crate::proxy::{ProxyContext, ProxyError};

/// Proxy one inbound request to the backend and relay the response.
///
/// `rel_path` is the backend path with the proxy prefix already removed
/// and no leading slash.
pub async fn dispatch(
    ctx: &ProxyContext,
    rel_path: &str,
    request: Request,
) -> Result<Response<Body>, ProxyError> {
    let method = request.method().clone();
    let url = upstream_url(
        ctx.origin.as_str(),
        &ctx.rules.normalize(rel_path),
        request.uri().query(),
    );

    let inbound_headers = request.headers().clone();
    let payload = match method {
        Method::POST | Method::PUT | Method::PATCH => {
            body::extract(request, ctx.max_body_bytes).await?
        }
        _ => Payload::Empty,
    };
    let outbound_headers = headers::sanitize(&inbound_headers, &payload);

    tracing::debug!(method = %method, url = %url, "forwarding request upstream");

    let mut upstream = ctx
        .client
        .request(method, url.as_str())
        .headers(outbound_headers);
    upstream = match payload {
        Payload::Text(text) => upstream.body(text),
        Payload::Multipart(parts) => upstream.multipart(build_form(parts)?),
        Payload::Empty => upstream,
    };

    let response = upstream.send().await?;
    relay(response).await
}

/// `origin + "/" + normalized path + raw query`, query byte-for-byte.
fn upstream_url(origin: &str, normalized: &str, query: Option<&str>) -> String {
    let mut url = format!("{origin}/{normalized}");
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Rebuild a multipart form for the upstream client, which generates a
/// fresh boundary for the re-framed parts.
fn build_form(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form, ProxyError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let mut outbound = reqwest::multipart::Part::bytes(part.data.to_vec());
        if let Some(file_name) = part.file_name {
            outbound = outbound.file_name(file_name);
        }
        if let Some(content_type) = part.content_type {
            outbound = outbound.mime_str(&content_type)?;
        }
        form = form.part(part.name, outbound);
    }
    Ok(form)
}

/// Relay the upstream response verbatim: status, headers, fully read body.
async fn relay(upstream: reqwest::Response) -> Result<Response<Body>, ProxyError> {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    // The body is relayed as a sized body, so the upstream framing
    // headers no longer describe it.
    headers.remove(TRANSFER_ENCODING);
    headers.remove(CONNECTION);

    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_appends_query_verbatim() {
        let url = upstream_url(
            "http://backend:8000/api/v1",
            "transcriptions/",
            Some("limit=10&offset=0"),
        );
        assert_eq!(
            url,
            "http://backend:8000/api/v1/transcriptions/?limit=10&offset=0"
        );
    }

    #[test]
    fn url_without_query() {
        let url = upstream_url("http://backend:8000/api/v1", "auth/login", None);
        assert_eq!(url, "http://backend:8000/api/v1/auth/login");
    }

    #[test]
    fn empty_path_targets_origin_root() {
        let url = upstream_url("http://backend:8000/api/v1", "", None);
        assert_eq!(url, "http://backend:8000/api/v1/");
    }
}
