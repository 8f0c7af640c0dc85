use thiserror::Error;

/// A setting the operator has to fix before contact messages can be
/// delivered. Never caused by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Misconfiguration {
    #[error("CONTACT_TO missing")]
    MissingRecipients,
    #[error("invalid provider")]
    InvalidProvider,
    #[error("RESEND_API_KEY missing")]
    MissingResendApiKey,
    #[error("SMTP_HOST missing")]
    MissingSmtpHost,
}
