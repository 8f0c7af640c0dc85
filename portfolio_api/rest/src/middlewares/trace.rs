use std::time::Duration;

use axum::{extract::Request, response::Response, Router};
use tower_http::trace::TraceLayer;
use tracing::{debug, debug_span, field, warn, Span};

use super::request_id::RequestId;

/// Wraps every request in a span carrying its id. Server errors are logged
/// as warnings, everything else at debug level.
pub fn add(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_request(())
            .on_response(log_response)
            .on_body_chunk(())
            .on_eos(())
            .on_failure(()),
    )
}

fn request_span(request: &Request) -> Span {
    let request_id = request.extensions().get::<RequestId>().copied();
    debug_span!(
        "request",
        method = %request.method(),
        path = request.uri().path(),
        request_id = request_id.map(field::display),
    )
}

fn log_response(response: &Response, latency: Duration, _span: &Span) {
    let status = response.status();
    if status.is_server_error() {
        warn!(%status, ?latency, "request failed");
    } else {
        debug!(%status, ?latency, "request handled");
    }
}
