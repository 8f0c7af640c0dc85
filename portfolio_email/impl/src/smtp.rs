use anyhow::Context;
use lettre::{
    message::{header, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{Email, MailTransport, MailTransportError};
use portfolio_models::email_address::EmailAddressWithName;
use portfolio_utils::Apply;
use tracing::error;

/// Delivers emails by direct submission to an SMTP server.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone)]
pub struct SmtpTransportConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Use implicit TLS. Otherwise the connection is not encrypted.
    pub secure: bool,
    pub from: EmailAddressWithName,
}

impl SmtpTransport {
    pub fn new(config: SmtpTransportConfig) -> anyhow::Result<Self> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .context("Failed to configure TLS for the SMTP transport")?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let credentials = credentials(config.user, config.pass);

        let transport = builder
            .port(config.port)
            .apply_map(credentials, |builder, credentials| {
                builder.credentials(credentials)
            })
            .build();

        Ok(Self {
            from: config.from.0,
            transport,
        })
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow::anyhow!("Failed to ping smtp server"))
    }
}

impl SmtpTransport {
    /// Addresses every configured recipient, skipping empty entries of the
    /// recipient list.
    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let builder = email.recipients.split().into_iter().try_fold(
            Message::builder().from(self.from.clone()),
            |builder, to| {
                let to = to
                    .parse::<Mailbox>()
                    .with_context(|| format!("Invalid recipient {to:?}"))?;
                anyhow::Ok(builder.to(to))
            },
        )?;

        builder
            .apply_map(
                email.reply_to.map(|x| Mailbox::new(None, x.0)),
                |builder, reply_to| builder.reply_to(reply_to),
            )
            .subject(email.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(email.body)
            .context("Failed to build email")
    }
}

/// Authentication is only attempted if both user and password are set.
fn credentials(user: Option<String>, pass: Option<String>) -> Option<Credentials> {
    user.zip(pass).map(|(user, pass)| Credentials::new(user, pass))
}

impl MailTransport for SmtpTransport {
    async fn send(&self, email: Email) -> Result<bool, MailTransportError> {
        let message = self.build_message(email)?;

        match self.transport.send(message).await {
            Ok(response) => Ok(response.is_positive()),
            Err(err) if err.is_permanent() || err.is_transient() || err.is_timeout() => {
                error!("SMTP server did not accept the email: {err}");
                Ok(false)
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context("Failed to send email via SMTP")
                .into()),
        }
    }
}
