//! Request-scoped handle.
//!
//! Every harness endpoint builds one `RequestContext` and passes it explicitly to the
//! executor and to every store call. It carries the request id used to correlate log
//! lines (including lines emitted from fan-out tasks) and the tracing span they are
//! recorded under.

use axum::http::HeaderMap;
use tracing::Span;
use uuid::Uuid;

/// Header used to carry a caller-chosen request id. Forwarded to remote stores.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    span: Span,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, path: &str) -> Self {
        let request_id = request_id.into();
        let span = tracing::info_span!("request", request_id = %request_id, path = %path);
        Self { request_id, span }
    }

    /// Reuses the caller's `x-request-id` when present, otherwise mints a UUID v4.
    pub fn from_headers(headers: &HeaderMap, path: &str) -> Self {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self::new(request_id, path)
    }

    /// Context for work that is not tied to an incoming request (tests, tooling).
    pub fn detached(label: &str) -> Self {
        Self::new(Uuid::new_v4().to_string(), label)
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_id_taken_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-42"));

        let ctx = RequestContext::from_headers(&headers, "/putSerial");
        assert_eq!(ctx.request_id(), "req-42");
    }

    #[test]
    fn test_request_id_generated_when_missing_or_blank() {
        let ctx = RequestContext::from_headers(&HeaderMap::new(), "/getMulti");
        assert!(Uuid::parse_str(ctx.request_id()).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        let ctx = RequestContext::from_headers(&headers, "/getMulti");
        assert!(Uuid::parse_str(ctx.request_id()).is_ok());
    }

    #[test]
    fn test_detached_contexts_are_distinct() {
        let a = RequestContext::detached("test");
        let b = RequestContext::detached("test");
        assert_ne!(a.request_id(), b.request_id());
    }
}
