use anyhow::ensure;
use clap::Args;
use portfolio_email_impl::http::HttpClient;
use portfolio_models::{
    contact::ContactField,
    form::{ContactForm, ContactFormValues, FormStatus, PreparedSubmission},
};
use tracing::{debug, warn};
use url::Url;

/// The fields of a contact form submission.
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// The contact endpoint of a running server
    #[arg(long, default_value = "http://127.0.0.1:8000/api/contact")]
    pub endpoint: Url,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub subject: String,
    #[arg(long)]
    pub message: String,
}

impl SubmitArgs {
    pub async fn invoke(self) -> anyhow::Result<()> {
        let values = ContactFormValues {
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            website: String::new(),
        };

        let form = submit(&HttpClient::new()?, &self.endpoint, &values).await;

        for field in ContactField::ALL {
            if let Some(issue) = form.errors().get(field) {
                eprintln!("{}: {issue}", field.as_str());
            }
        }
        if let Some(message) = form.status().message() {
            println!("{message}");
        }

        ensure!(
            form.errors().is_empty() && form.status() != FormStatus::Error,
            "Submission failed"
        );

        Ok(())
    }
}

/// Runs the contact form submission flow against `endpoint` and returns the
/// resulting form state.
pub async fn submit(http: &HttpClient, endpoint: &Url, values: &ContactFormValues) -> ContactForm {
    let mut form = ContactForm::default();

    let submission = match form.prepare(values) {
        PreparedSubmission::Ready(submission) => submission,
        PreparedSubmission::Ignored => {
            debug!("Ignoring submission with filled honeypot");
            return form;
        }
        PreparedSubmission::Invalid => return form,
    };

    let delivered = match http.post(endpoint.clone()).json(&submission).send().await {
        Ok(response) => response.status().is_success(),
        Err(err) => {
            warn!("Failed to submit contact message: {err}");
            false
        }
    };
    form.finish(delivered);

    form
}
