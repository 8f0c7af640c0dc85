use std::{
    net::{Ipv4Addr, SocketAddr},
    path::Path,
    sync::Arc,
};

use portfolio::{commands::submit::submit, environment};
use portfolio_config::{Config, DEFAULT_CONFIG_PATH};
use portfolio_email_impl::http::HttpClient;
use portfolio_models::{
    contact::{ContactField, FieldIssue},
    form::{ContactFormValues, FormStatus},
};
use portfolio_testing::resend::{FakeResend, ReceivedEmail};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use url::Url;

const API_KEY: &str = "re_test";

#[tokio::test]
async fn deliver_via_resend() {
    // Arrange
    let (fake, overrides) = resend().await;
    let url = spawn(&overrides).await;

    // Act
    let (status, body) = post(&url, valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(
        fake.received(),
        [ReceivedEmail {
            from: "Portfolio <no-reply@example.com>".into(),
            to: vec!["contact@example.com".into(), "office@example.com".into()],
            reply_to: Some("max.mustermann@example.de".into()),
            subject: "Hello".into(),
            text: "Name: Max Mustermann\nEmail: max.mustermann@example.de\nSubject: Hello\n\nHello World, how are you?".into(),
        }]
    );
}

#[tokio::test]
async fn default_subject() {
    // Arrange
    let (fake, overrides) = resend().await;
    let url = spawn(&overrides).await;

    // Act
    let (status, _) = post(
        &url,
        json!({
            "name": "Max Mustermann",
            "email": "max.mustermann@example.de",
            "subject": "   ",
            "message": "Hello World, how are you?",
        }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let received = fake.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].subject, "New contact: Max Mustermann — Portfolio");
}

#[tokio::test]
async fn short_message() {
    // Arrange
    let (fake, overrides) = resend().await;
    let url = spawn(&overrides).await;

    // Act
    let (status, body) = post(
        &url,
        json!({"name": "Al", "email": "a@b.com", "message": "short"}),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "VALIDATION", "issues": {"message": ["Message is too short"]}})
    );
    assert!(fake.received().is_empty());
}

#[tokio::test]
async fn provider_unset() {
    // Arrange
    let url = spawn(&["contact.to = \"contact@example.com\""]).await;

    // Act
    let (status, body) = post(&url, valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "SERVER_MISCONFIGURED", "detail": "invalid provider"})
    );
}

#[tokio::test]
async fn provider_invalid() {
    // Arrange
    let url = spawn(&[
        "contact.to = \"contact@example.com\"\ncontact.provider = \"carrier-pigeon\"",
    ])
    .await;

    // Act
    let (status, body) = post(&url, valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "SERVER_MISCONFIGURED", "detail": "invalid provider"})
    );
}

#[tokio::test]
async fn resend_api_key_missing() {
    // Arrange
    let url = spawn(&["contact.to = \"contact@example.com\"\ncontact.provider = \"resend\""]).await;

    // Act
    let (status, body) = post(&url, valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "SERVER_MISCONFIGURED", "detail": "RESEND_API_KEY missing"})
    );
}

#[tokio::test]
async fn smtp_host_missing() {
    // Arrange
    let url = spawn(&["contact.to = \"contact@example.com\"\ncontact.provider = \"smtp\""]).await;

    // Act
    let (status, body) = post(&url, valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "SERVER_MISCONFIGURED", "detail": "SMTP_HOST missing"})
    );
}

#[tokio::test]
async fn recipients_missing() {
    // Arrange
    let (fake, mut overrides) = resend().await;
    overrides.push("contact.to = \"\"".into());
    let url = spawn(&overrides).await;

    // Act
    let (status, body) = post(&url, valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "SERVER_MISCONFIGURED", "detail": "CONTACT_TO missing"})
    );
    assert!(fake.received().is_empty());
}

#[tokio::test]
async fn provider_rejects_message() {
    // Arrange
    let (fake, mut overrides) = resend().await;
    overrides.push("contact.to = \"fail@example.com\"".into());
    let url = spawn(&overrides).await;

    // Act
    let (status, body) = post(&url, valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "SEND_FAILED"}));
    assert!(fake.received().is_empty());
}

#[tokio::test]
async fn submit_form() {
    // Arrange
    let (fake, overrides) = resend().await;
    let url = spawn(&overrides).await;
    let values = ContactFormValues {
        name: "  Max Mustermann ".into(),
        email: " max.mustermann@example.de".into(),
        subject: String::new(),
        message: "Hello World, how are you?".into(),
        website: String::new(),
    };

    // Act
    let form = submit(&HttpClient::new().unwrap(), &url, &values).await;

    // Assert
    assert_eq!(form.status(), FormStatus::Ok);
    assert!(!form.is_submitting());
    let received = fake.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].reply_to.as_deref(), Some("max.mustermann@example.de"));
    assert_eq!(received[0].subject, "New contact: Max Mustermann — Portfolio");
}

#[tokio::test]
async fn submit_form_honeypot() {
    // Arrange
    let (fake, overrides) = resend().await;
    let url = spawn(&overrides).await;
    let values = ContactFormValues {
        website: "https://spam.example.com".into(),
        ..form_values()
    };

    // Act
    let form = submit(&HttpClient::new().unwrap(), &url, &values).await;

    // Assert
    assert_eq!(form.status(), FormStatus::Idle);
    assert!(fake.received().is_empty());
}

#[tokio::test]
async fn submit_form_invalid() {
    // Arrange
    let (fake, overrides) = resend().await;
    let url = spawn(&overrides).await;
    let values = ContactFormValues {
        email: "not-an-email".into(),
        ..form_values()
    };

    // Act
    let form = submit(&HttpClient::new().unwrap(), &url, &values).await;

    // Assert
    assert_eq!(form.status(), FormStatus::Idle);
    assert_eq!(
        form.errors().get(ContactField::Email),
        Some(FieldIssue::InvalidEmail)
    );
    assert!(fake.received().is_empty());
}

#[tokio::test]
async fn submit_form_send_failed() {
    // Arrange
    let url = spawn(&["contact.to = \"contact@example.com\""]).await;

    // Act
    let form = submit(&HttpClient::new().unwrap(), &url, &form_values()).await;

    // Assert
    assert_eq!(form.status(), FormStatus::Error);
    assert!(form.status().message().unwrap().contains("try again"));
}

fn form_values() -> ContactFormValues {
    ContactFormValues {
        name: "Max Mustermann".into(),
        email: "max.mustermann@example.de".into(),
        subject: "Hello".into(),
        message: "Hello World, how are you?".into(),
        website: String::new(),
    }
}

fn valid_body() -> Value {
    json!({
        "name": "Max Mustermann",
        "email": "max.mustermann@example.de",
        "subject": "Hello",
        "message": "Hello World, how are you?",
    })
}

/// Starts a fake resend server and returns config overrides that point a
/// complete resend setup at it.
async fn resend() -> (Arc<FakeResend>, Vec<String>) {
    let (endpoint, fake) = portfolio_testing::resend::spawn(API_KEY).await.unwrap();
    let overrides = vec![
        "contact.provider = \"resend\"".into(),
        "contact.to = \"contact@example.com, office@example.com\"".into(),
        format!("resend.api_key = \"{API_KEY}\"\nresend.endpoint_override = \"{endpoint}\""),
    ];
    (fake, overrides)
}

async fn spawn(overrides: &[impl AsRef<str>]) -> Url {
    let overrides = overrides.iter().map(AsRef::as_ref).collect::<Vec<_>>();
    let config: Config =
        portfolio_config::load_with_override(&[Path::new(DEFAULT_CONFIG_PATH)], &overrides)
            .unwrap();

    let transport = environment::transport(&config).unwrap();
    let server = environment::rest_server(transport, &config);

    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve_on(listener));

    format!("http://{addr}/api/contact").parse().unwrap()
}

async fn post(url: &Url, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(url.clone())
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}
