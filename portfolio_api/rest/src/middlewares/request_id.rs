//! Tags every request and its response with a fresh `X-Request-Id`.

use std::fmt;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use base64::{display::Base64Display, engine::general_purpose::STANDARD_NO_PAD};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub fn add(router: Router) -> Router {
    router.layer(from_fn(tag_request))
}

async fn tag_request(mut request: Request, next: Next) -> Response {
    let id = RequestId::generate();
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }
    response
}

/// Time ordered, rendered as unpadded base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Base64Display::new(self.0.as_bytes(), &STANDARD_NO_PAD))
    }
}
