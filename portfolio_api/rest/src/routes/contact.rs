use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::{ContactSendMessageError, ContactService};
use portfolio_models::contact::ContactSubmissionInput;
use serde_json::Value;
use tracing::debug;

use crate::{
    errors::{error, internal_server_error},
    models::{ApiError, ApiOk},
};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(service: State<Arc<impl ContactService>>, body: Bytes) -> Response {
    // Unparsable bodies are handled like an empty object and fail validation.
    let body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|err| {
        debug!("failed to parse contact request body: {err}");
        Value::Object(Default::default())
    });

    match service
        .send_message(ContactSubmissionInput::from_json(&body))
        .await
    {
        Ok(()) => Json(ApiOk { ok: true }).into_response(),
        Err(ContactSendMessageError::Validation(issues)) => {
            error(StatusCode::BAD_REQUEST, ApiError::Validation { issues: &issues })
        }
        Err(ContactSendMessageError::Misconfigured(misconfiguration)) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServerMisconfigured {
                detail: misconfiguration.to_string(),
            },
        ),
        Err(ContactSendMessageError::Send) => error(StatusCode::BAD_GATEWAY, ApiError::SendFailed),
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}
