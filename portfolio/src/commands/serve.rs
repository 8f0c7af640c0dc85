use portfolio_config::Config;
use portfolio_email_impl::ConfiguredTransport;
use tracing::{info, warn};

use crate::environment;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let transport = environment::transport(&config)?;
    match &transport {
        ConfiguredTransport::Resend(_) => info!("Delivering contact messages via resend"),
        ConfiguredTransport::Smtp(smtp) => {
            info!("Connecting to smtp server");
            if let Err(err) = smtp.ping().await {
                warn!("Smtp server is not reachable: {err:#}");
            }
        }
        ConfiguredTransport::Unavailable(misconfiguration) => {
            warn!("Contact messages cannot be delivered: {misconfiguration}");
        }
    }

    let server = environment::rest_server(transport, &config);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
