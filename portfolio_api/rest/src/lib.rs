use std::net::IpAddr;

use anyhow::Context;
use axum::Router;
use portfolio_core_contact_contracts::ContactService;
use tokio::net::TcpListener;

mod errors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    contact: Contact,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact) -> Self {
        Self { contact }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        self.serve_on(listener).await
    }

    /// Serves the API on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        axum::serve(listener, self.router())
            .await
            .context("Failed to start HTTP server")
    }

    fn router(self) -> Router<()> {
        let router = Router::new().merge(routes::contact::router(self.contact.into()));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}
