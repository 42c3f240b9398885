//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an `x-request-id` supplied by an upstream proxy when it looks sane,
//! otherwise generates a UUID v4. The id is recorded on the request span,
//! tagged in Sentry, stored in request extensions and echoed in the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// The id assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Middleware that ensures every request carries a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// An upstream request id, if present, short, and printable ASCII.
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();

    let acceptable = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());

    acceptable.then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
        headers
    }

    #[test]
    fn test_reuses_upstream_id() {
        assert_eq!(
            incoming_request_id(&headers_with("cf-1234")),
            Some("cf-1234".to_owned())
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(incoming_request_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_rejects_oversized_id() {
        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        assert_eq!(incoming_request_id(&headers_with(&long)), None);
    }

    #[test]
    fn test_rejects_inner_whitespace() {
        assert_eq!(incoming_request_id(&headers_with("abc def")), None);
    }
}
