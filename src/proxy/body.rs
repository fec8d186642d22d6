//! Content-type driven body extraction.
//!
//! # Responsibilities
//! - Read the inbound body fully, dispatching on the declared content type
//! - Produce a tagged payload: text, structured multipart, or nothing
//!
//! # Design Decisions
//! - Dispatch is a case-insensitive substring match, so `charset` or
//!   `boundary` parameters never change the branch
//! - JSON and form-urlencoded bodies are opaque text and must not be
//!   re-encoded: the backend's login flow parses the form bytes directly
//! - Multipart is parsed into parts so the upstream client can re-frame
//!   it with a fresh boundary; forwarding the original framing as text
//!   would corrupt the request

use axum::body::{to_bytes, Bytes};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;

use crate::proxy::ProxyError;

/// The extracted request payload.
#[derive(Debug)]
pub enum Payload {
    /// Raw textual body, forwarded byte-for-byte.
    Text(String),
    /// Structured multipart form; the outbound client re-frames it.
    Multipart(Vec<FormPart>),
    /// No body present. GET and DELETE always land here.
    Empty,
}

/// One part of a multipart form.
#[derive(Debug)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Read the inbound body according to its declared content type.
pub async fn extract(request: Request, max_bytes: usize) -> Result<Payload, ProxyError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.contains("multipart/form-data") {
        return extract_multipart(request).await;
    }

    // application/json, application/x-www-form-urlencoded, and anything
    // else with a body all take the same raw-text path.
    let bytes = to_bytes(request.into_body(), max_bytes).await?;
    if bytes.is_empty() && content_type.is_empty() {
        return Ok(Payload::Empty);
    }
    Ok(Payload::Text(
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

async fn extract_multipart(request: Request) -> Result<Payload, ProxyError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ProxyError::Multipart(e.to_string()))?;

    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ProxyError::Multipart(e.to_string()))?;
        parts.push(FormPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(Payload::Multipart(parts))
}
