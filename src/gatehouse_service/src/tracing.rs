//! Span and event hooks for the HTTP trace layer.

use std::time::Duration;

use axum::{body::Body, extract::Request, response::Response};
use tracing::Span;
use uuid::Uuid;

/// One span per request, tagged with a fresh request id so log lines from
/// concurrent requests stay distinguishable.
pub fn make_span_with_request_id(request: &Request<Body>) -> Span {
    let request_id = Uuid::new_v4();
    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}

pub fn on_request(_request: &Request<Body>, _span: &Span) {
    tracing::info!("started processing request");
}

pub fn on_response(response: &Response, latency: Duration, _span: &Span) {
    tracing::info!(
        status = %response.status(),
        latency = ?latency,
        "finished processing request"
    );
}
