use std::{future::Future, sync::Arc};

use portfolio_models::{email_address::EmailAddress, misconfiguration::Misconfiguration};
use thiserror::Error;

/// An outbound mechanism capable of delivering a single email.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait MailTransport: Send + Sync + 'static {
    /// Sends the email. Returns `false` if the provider rejected the email or
    /// failed to confirm that it has been accepted.
    fn send(&self, email: Email) -> impl Future<Output = Result<bool, MailTransportError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipients: Arc<RecipientList>,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<EmailAddress>,
}

#[derive(Debug, Error)]
pub enum MailTransportError {
    #[error("Mail transport is misconfigured: {0}")]
    Misconfigured(Misconfiguration),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The configured recipient setting, a comma separated list of addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientList(String);

impl RecipientList {
    /// Returns `None` if the setting is empty.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        (!raw.is_empty()).then_some(Self(raw))
    }

    /// The setting exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The individual addresses, trimmed, without empty entries.
    pub fn split(&self) -> Vec<&str> {
        self.0
            .split(',')
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .collect()
    }
}

#[cfg(feature = "mock")]
impl MockMailTransport {
    pub fn with_send(mut self, email: Email, result: bool) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_misconfigured(mut self, misconfiguration: Misconfiguration) -> Self {
        self.expect_send().once().return_once(move |_| {
            Box::pin(std::future::ready(Err(MailTransportError::Misconfigured(
                misconfiguration,
            ))))
        });
        self
    }
}
