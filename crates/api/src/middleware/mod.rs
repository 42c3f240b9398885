//! HTTP middleware for the API.
//!
//! - [`request_id`] - Per-request correlation id
//! - [`cors_layer`] - Cross-origin access for the browser client
//! - [`trace_layer`] - Request spans for `tracing`

pub mod request_id;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, header};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};

/// Build the CORS layer.
///
/// An empty origin list allows any origin; otherwise only the listed ones.
/// Origins that are not valid header values are skipped with a warning.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Build the request tracing layer.
///
/// Spans declare an empty `request_id` field that the request id middleware
/// fills in.
#[must_use]
pub fn trace_layer()
-> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, impl Fn(&Request<Body>) -> Span + Clone> {
    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    })
}
