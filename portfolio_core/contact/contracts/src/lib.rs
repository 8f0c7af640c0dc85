use std::future::Future;

use portfolio_models::{
    contact::{ContactSubmissionInput, ValidationIssues},
    misconfiguration::Misconfiguration,
};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validates a contact form submission and forwards it to the configured
    /// recipients.
    fn send_message(
        &self,
        input: ContactSubmissionInput,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("Invalid contact form submission.")]
    Validation(ValidationIssues),
    #[error("Server is misconfigured: {0}")]
    Misconfigured(Misconfiguration),
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_send_message(
        mut self,
        input: ContactSubmissionInput,
        result: Result<(), ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(input))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
