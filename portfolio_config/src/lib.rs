use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{builder::DefaultState, ConfigBuilder, File, FileFormat};
use portfolio_models::email_address::EmailAddressWithName;
use serde::Deserialize;
use url::Url;

pub use crate::duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variables and the config keys they override.
const ENVIRONMENT: &[(&str, &str)] = &[
    ("CONTACT_PROVIDER", "contact.provider"),
    ("CONTACT_TO", "contact.to"),
    ("CONTACT_FROM", "contact.from"),
    ("RESEND_API_KEY", "resend.api_key"),
    ("SMTP_HOST", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_USER", "smtp.user"),
    ("SMTP_PASS", "smtp.pass"),
    ("SMTP_FROM", "smtp.from"),
];

/// Loads the config files listed in `PORTFOLIO_CONFIG` (colon separated,
/// defaults to [`DEFAULT_CONFIG_PATH`]) and applies the environment overrides.
pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var("PORTFOLIO_CONFIG") {
        Ok(paths) => paths.split(':').map(PathBuf::from).collect(),
        Err(_) => vec![PathBuf::from(DEFAULT_CONFIG_PATH)],
    };

    let builder = ENVIRONMENT
        .iter()
        .try_fold(sources(&paths)?, |builder, &(var, key)| {
            let value = std::env::var(var).ok().filter(|x| !x.is_empty());
            builder.set_override_option(key, value)
        })?;

    deserialize(builder)
}

/// Loads the given config files followed by additional toml snippets. The
/// environment is ignored.
pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = overrides.iter().fold(sources(paths)?, |builder, snippet| {
        builder.add_source(File::from_str(snippet, FileFormat::Toml))
    });

    deserialize(builder)
}

fn sources(paths: &[impl AsRef<Path>]) -> anyhow::Result<ConfigBuilder<DefaultState>> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })
}

fn deserialize(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Config> {
    builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub contact: ContactConfig,
    pub resend: ResendConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub provider: Option<String>,
    pub to: Option<String>,
    pub from: EmailAddressWithName,
    pub send_timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ResendConfig {
    pub api_key: Option<String>,
    pub endpoint_override: Option<Url>,
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub secure: bool,
    pub from: EmailAddressWithName,
}
