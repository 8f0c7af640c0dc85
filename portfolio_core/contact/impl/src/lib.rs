use std::{sync::Arc, time::Duration};

use portfolio_core_contact_contracts::{ContactSendMessageError, ContactService};
use portfolio_email_contracts::{Email, MailTransport, MailTransportError, RecipientList};
use portfolio_models::{
    contact::{ContactSubmission, ContactSubmissionInput},
    misconfiguration::Misconfiguration,
};
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Transport> {
    transport: Transport,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// `None` if no recipients have been configured.
    pub recipients: Option<Arc<RecipientList>>,
    pub send_timeout: Duration,
}

impl<Transport> ContactServiceImpl<Transport> {
    pub fn new(transport: Transport, config: ContactFeatureConfig) -> Self {
        Self { transport, config }
    }
}

impl<Transport> ContactService for ContactServiceImpl<Transport>
where
    Transport: MailTransport,
{
    async fn send_message(&self, input: ContactSubmissionInput) -> Result<(), ContactSendMessageError> {
        let submission = input
            .validate()
            .map_err(ContactSendMessageError::Validation)?;

        let Some(recipients) = self.config.recipients.clone() else {
            error!("Cannot send contact message: {}", Misconfiguration::MissingRecipients);
            return Err(ContactSendMessageError::Misconfigured(
                Misconfiguration::MissingRecipients,
            ));
        };

        let email = make_email(submission, recipients);

        match tokio::time::timeout(self.config.send_timeout, self.transport.send(email)).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(ContactSendMessageError::Send),
            Ok(Err(MailTransportError::Misconfigured(misconfiguration))) => {
                error!("Cannot send contact message: {misconfiguration}");
                Err(ContactSendMessageError::Misconfigured(misconfiguration))
            }
            Ok(Err(MailTransportError::Other(err))) => Err(err.into()),
            Err(_) => {
                warn!(timeout = ?self.config.send_timeout, "Sending contact message timed out");
                Err(ContactSendMessageError::Send)
            }
        }
    }
}

fn make_email(submission: ContactSubmission, recipients: Arc<RecipientList>) -> Email {
    let ContactSubmission {
        name,
        email,
        subject,
        message,
    } = submission;

    let body = format!(
        "Name: {}\nEmail: {email}\nSubject: {}\n\n{}",
        *name, *subject, *message
    );

    let subject = if subject.trim().is_empty() {
        format!("New contact: {} — Portfolio", *name)
    } else {
        subject.into_inner()
    };

    Email {
        recipients,
        subject,
        body,
        reply_to: Some(email),
    }
}
