use std::sync::Arc;

use anyhow::Context;
use portfolio_config::Config;
use portfolio_core_contact_impl::{ContactFeatureConfig, ContactServiceImpl};
use portfolio_email_contracts::RecipientList;
use portfolio_email_impl::{ConfiguredTransport, TransportSettings};

pub type ContactService = ContactServiceImpl<ConfiguredTransport>;
pub type RestServer = portfolio_api_rest::RestServer<ContactService>;

/// Select and build the mail transport named by `contact.provider`.
pub fn transport(config: &Config) -> anyhow::Result<ConfiguredTransport> {
    ConfiguredTransport::new(TransportSettings {
        provider: config.contact.provider.clone(),
        resend_endpoint_override: config.resend.endpoint_override.clone(),
        resend_api_key: config.resend.api_key.clone(),
        resend_from: config.contact.from.clone(),
        smtp_host: config.smtp.host.clone(),
        smtp_port: config.smtp.port,
        smtp_user: config.smtp.user.clone(),
        smtp_pass: config.smtp.pass.clone(),
        smtp_secure: config.smtp.secure,
        smtp_from: config.smtp.from.clone(),
    })
    .context("Failed to set up the mail transport")
}

pub fn contact_feature_config(config: &Config) -> ContactFeatureConfig {
    ContactFeatureConfig {
        recipients: config
            .contact
            .to
            .as_deref()
            .and_then(RecipientList::new)
            .map(Arc::new),
        send_timeout: *config.contact.send_timeout,
    }
}

pub fn rest_server(transport: ConfiguredTransport, config: &Config) -> RestServer {
    RestServer::new(ContactServiceImpl::new(
        transport,
        contact_feature_config(config),
    ))
}
