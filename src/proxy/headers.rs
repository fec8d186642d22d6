//! Outbound header sanitization.
//!
//! # Responsibilities
//! - Strip the host header (it names the edge, not the backend)
//! - Strip hop-by-hop headers that only apply to the client-edge leg
//! - Strip framing headers the outbound transport must recompute
//!
//! # Design Decisions
//! - Sanitization is a denial list, not an allow list: everything not
//!   explicitly stripped passes through verbatim, in particular
//!   `authorization` and arbitrary custom headers
//! - `content-length` is always removed; the client recomputes it from
//!   the actual outbound body
//! - For multipart payloads `content-type` is removed too, so the
//!   client generates a fresh boundary matching the re-framed body
//! - Duplicate header names are last-write-wins

use axum::http::header::{
    HeaderMap, HeaderName, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST, TRANSFER_ENCODING,
    UPGRADE,
};

use crate::proxy::Payload;

const KEEP_ALIVE: HeaderName = HeaderName::from_static("keep-alive");

/// Headers that never cross the proxy boundary.
const STRIPPED: [HeaderName; 6] = [
    HOST,
    CONNECTION,
    KEEP_ALIVE,
    TRANSFER_ENCODING,
    UPGRADE,
    CONTENT_LENGTH,
];

/// Build the outbound header set from the inbound headers and payload.
pub fn sanitize(inbound: &HeaderMap, payload: &Payload) -> HeaderMap {
    let strip_content_type = matches!(payload, Payload::Multipart(_));

    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if STRIPPED.iter().any(|stripped| stripped == name)
            || (strip_content_type && *name == CONTENT_TYPE)
        {
            continue;
        }
        outbound.insert(name.clone(), value.clone());
    }
    outbound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::HeaderValue;

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("edge.example.com"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(KEEP_ALIVE, HeaderValue::from_static("timeout=5"));
        headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(UPGRADE, HeaderValue::from_static("websocket"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer secret-token"),
        );
        headers.insert("x-custom", HeaderValue::from_static("kept"));
        headers
    }

    #[test]
    fn denial_list_is_stripped() {
        let outbound = sanitize(&inbound(), &Payload::Empty);
        for name in [
            HOST,
            CONNECTION,
            KEEP_ALIVE,
            TRANSFER_ENCODING,
            UPGRADE,
            CONTENT_LENGTH,
        ] {
            assert!(!outbound.contains_key(&name), "{name} should be stripped");
        }
    }

    #[test]
    fn everything_else_passes_through_verbatim() {
        let outbound = sanitize(&inbound(), &Payload::Text("{}".to_string()));
        assert_eq!(
            outbound.get("authorization").unwrap(),
            "Bearer secret-token"
        );
        assert_eq!(outbound.get("x-custom").unwrap(), "kept");
        assert_eq!(outbound.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn multipart_payload_drops_content_type() {
        let mut headers = inbound();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=old"),
        );
        let payload = Payload::Multipart(vec![crate::proxy::body::FormPart {
            name: "file".to_string(),
            file_name: None,
            content_type: None,
            data: Bytes::new(),
        }]);
        let outbound = sanitize(&headers, &payload);
        assert!(!outbound.contains_key(CONTENT_TYPE));
        assert!(outbound.contains_key("authorization"));
    }
}
