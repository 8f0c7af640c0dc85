use std::sync::Arc;

use anyhow::Context;
use portfolio_email_contracts::{Email, MailTransport, MailTransportError};
use portfolio_models::email_address::EmailAddressWithName;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::http::HttpClient;

/// https://resend.com/docs/api-reference/emails/send-email
const API_ENDPOINT: &str = "https://api.resend.com/";

/// Delivers emails through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendTransport {
    config: Arc<ResendTransportConfig>,
    http: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ResendTransportConfig {
    endpoint: Url,
    api_key: String,
    from: String,
}

impl ResendTransportConfig {
    pub fn new(
        endpoint_override: Option<Url>,
        api_key: String,
        from: EmailAddressWithName,
    ) -> anyhow::Result<Self> {
        let endpoint = match endpoint_override {
            Some(endpoint) => endpoint,
            None => API_ENDPOINT.parse().context("Failed to parse resend endpoint")?,
        };

        Ok(Self {
            endpoint,
            api_key,
            from: from.to_string(),
        })
    }
}

impl ResendTransport {
    pub fn new(config: ResendTransportConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config: config.into(),
            http: HttpClient::new()?,
        })
    }
}

impl MailTransport for ResendTransport {
    async fn send(&self, email: Email) -> Result<bool, MailTransportError> {
        let url = self
            .config
            .endpoint
            .join("emails")
            .context("Failed to build resend emails URL")?;

        let request = SendEmailRequest {
            from: &self.config.from,
            to: email.recipients.split(),
            reply_to: email.reply_to.as_ref().map(|x| x.as_str()),
            subject: &email.subject,
            text: &email.body,
        };

        let response = match self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!("Failed to send resend request: {err}");
                return Ok(false);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(%status, "Resend error: {detail}");
            return Ok(false);
        }

        match response.json::<SendEmailResponse>().await {
            Ok(SendEmailResponse { id }) => {
                debug!(%id, "email accepted by resend");
                Ok(true)
            }
            Err(err) => {
                error!("Failed to deserialize resend response: {err}");
                Ok(false)
            }
        }
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}
