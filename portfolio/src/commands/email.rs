use std::sync::Arc;

use anyhow::{bail, ensure};
use clap::Subcommand;
use portfolio_config::Config;
use portfolio_email_contracts::{Email, MailTransport, MailTransportError, RecipientList};
use portfolio_email_impl::ConfiguredTransport;
use portfolio_models::email_address::EmailAddressWithName;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability using the configured provider
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let transport = environment::transport(&config)?;
    if let ConfiguredTransport::Unavailable(misconfiguration) = transport {
        bail!("Email delivery is misconfigured: {misconfiguration}");
    }

    let Some(recipients) = RecipientList::new(recipient.to_string()) else {
        bail!("Invalid recipient");
    };

    let ok = transport
        .send(Email {
            recipients: Arc::new(recipients),
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            reply_to: None,
        })
        .await
        .map_err(|err| match err {
            MailTransportError::Misconfigured(misconfiguration) => {
                anyhow::anyhow!("Email delivery is misconfigured: {misconfiguration}")
            }
            MailTransportError::Other(err) => err,
        })?;

    ensure!(ok, "Failed to send email");

    Ok(())
}
