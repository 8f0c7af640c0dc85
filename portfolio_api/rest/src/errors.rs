use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiError;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, ApiError::ServerError)
}

pub fn error(code: StatusCode, error: ApiError<'_>) -> Response {
    (code, Json(error)).into_response()
}
