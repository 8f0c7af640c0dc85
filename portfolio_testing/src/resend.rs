//! A fake implementation of the Resend `POST /emails` endpoint.
//!
//! Requests authenticated with the configured api key are accepted and kept in
//! memory, unless one of the recipients uses the local part `fail`, in which
//! case the fake provider responds with an application error.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;
use url::Url;
use uuid::Uuid;

const EMAILS_ROUTE: &str = "/emails";

/// An email accepted by the fake provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReceivedEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug)]
pub struct FakeResend {
    api_key: String,
    received: Mutex<Vec<ReceivedEmail>>,
}

impl FakeResend {
    pub fn new(api_key: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            api_key: api_key.into(),
            received: Mutex::default(),
        })
    }

    /// Returns all emails accepted so far.
    pub fn received(&self) -> Vec<ReceivedEmail> {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, email: ReceivedEmail) {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(email);
    }
}

pub fn router(state: Arc<FakeResend>) -> Router<()> {
    Router::new()
        .route(EMAILS_ROUTE, routing::post(send_email))
        .with_state(state)
}

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting fake resend server on {host}:{port}");
    info!("Resend endpoint: http://{host}:{port}/");
    info!("Api key: {api_key:?}");
    info!("Emails to recipients with the local part \"fail\" are rejected");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(FakeResend::new(api_key)))
        .await
        .context("Failed to start HTTP server")
}

/// Starts the fake provider on an ephemeral localhost port in the background
/// and returns the endpoint to configure the resend transport with.
pub async fn spawn(api_key: impl Into<String>) -> anyhow::Result<(Url, Arc<FakeResend>)> {
    let state = FakeResend::new(api_key);
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await
        .context("Failed to bind fake resend server")?;
    let addr = listener.local_addr()?;

    let router = router(Arc::clone(&state));
    tokio::spawn(async move { axum::serve(listener, router).await });

    let endpoint = format!("http://{addr}/")
        .parse()
        .context("Failed to build fake resend endpoint")?;
    Ok((endpoint, state))
}

async fn send_email(
    state: State<Arc<FakeResend>>,
    headers: HeaderMap,
    Json(email): Json<ReceivedEmail>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|x| x.to_str().ok())
        .and_then(|x| x.strip_prefix("Bearer "));
    match authorization {
        None => return error(StatusCode::UNAUTHORIZED, "missing_api_key", "Missing API key"),
        Some(api_key) if api_key != state.api_key => {
            return error(StatusCode::FORBIDDEN, "invalid_api_key", "API key is invalid")
        }
        Some(_) => {}
    }

    if email.to.is_empty() {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "Missing `to` field",
        );
    }

    if email.to.iter().any(|to| to.split('@').next() == Some("fail")) {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "application_error",
            "Something went wrong",
        );
    }

    state.push(email);
    Json(SendEmailResponse { id: Uuid::new_v4() }).into_response()
}

#[derive(Serialize)]
struct SendEmailResponse {
    id: Uuid,
}

fn error(status: StatusCode, name: &str, message: &str) -> Response {
    let body = json!({
        "statusCode": status.as_u16(),
        "name": name,
        "message": message,
    });
    (status, Json(body)).into_response()
}
