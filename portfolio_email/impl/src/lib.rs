use std::str::FromStr;

use portfolio_email_contracts::{Email, MailTransport, MailTransportError};
use portfolio_models::{
    email_address::EmailAddressWithName, misconfiguration::Misconfiguration,
};
use url::Url;

pub use crate::{
    resend::{ResendTransport, ResendTransportConfig},
    smtp::{SmtpTransport, SmtpTransportConfig},
};

pub mod http;
mod resend;
mod smtp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailProvider {
    Resend,
    Smtp,
}

impl FromStr for MailProvider {
    type Err = Misconfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("resend") {
            Ok(Self::Resend)
        } else if s.eq_ignore_ascii_case("smtp") {
            Ok(Self::Smtp)
        } else {
            Err(Misconfiguration::InvalidProvider)
        }
    }
}

/// Transport settings as configured by the operator. Required values are
/// optional here, missing ones are reported on each send.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub provider: Option<String>,
    pub resend_endpoint_override: Option<Url>,
    pub resend_api_key: Option<String>,
    pub resend_from: EmailAddressWithName,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub smtp_secure: bool,
    pub smtp_from: EmailAddressWithName,
}

/// The transport selected by the configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredTransport {
    Resend(ResendTransport),
    Smtp(SmtpTransport),
    Unavailable(Misconfiguration),
}

impl ConfiguredTransport {
    pub fn new(settings: TransportSettings) -> anyhow::Result<Self> {
        let provider = match settings.provider.as_deref().map(str::parse::<MailProvider>) {
            Some(Ok(provider)) => provider,
            Some(Err(misconfiguration)) => return Ok(Self::Unavailable(misconfiguration)),
            None => return Ok(Self::Unavailable(Misconfiguration::InvalidProvider)),
        };

        let transport = match provider {
            MailProvider::Resend => {
                let Some(api_key) = settings.resend_api_key else {
                    return Ok(Self::Unavailable(Misconfiguration::MissingResendApiKey));
                };
                Self::Resend(ResendTransport::new(ResendTransportConfig::new(
                    settings.resend_endpoint_override,
                    api_key,
                    settings.resend_from,
                )?)?)
            }
            MailProvider::Smtp => {
                let Some(host) = settings.smtp_host else {
                    return Ok(Self::Unavailable(Misconfiguration::MissingSmtpHost));
                };
                Self::Smtp(SmtpTransport::new(SmtpTransportConfig {
                    host,
                    port: settings.smtp_port,
                    user: settings.smtp_user,
                    pass: settings.smtp_pass,
                    secure: settings.smtp_secure,
                    from: settings.smtp_from,
                })?)
            }
        };

        Ok(transport)
    }

    pub fn provider(&self) -> Option<MailProvider> {
        match self {
            Self::Resend(_) => Some(MailProvider::Resend),
            Self::Smtp(_) => Some(MailProvider::Smtp),
            Self::Unavailable(_) => None,
        }
    }
}

impl MailTransport for ConfiguredTransport {
    async fn send(&self, email: Email) -> Result<bool, MailTransportError> {
        match self {
            Self::Resend(transport) => transport.send(email).await,
            Self::Smtp(transport) => transport.send(email).await,
            Self::Unavailable(misconfiguration) => {
                Err(MailTransportError::Misconfigured(*misconfiguration))
            }
        }
    }
}
