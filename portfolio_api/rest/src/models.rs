use portfolio_models::contact::ValidationIssues;
use serde::Serialize;

#[derive(Serialize)]
#[serde(tag = "error", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiError<'a> {
    /// The submission is invalid, the client can correct it.
    Validation { issues: &'a ValidationIssues },
    /// A setting is missing or invalid, only the operator can fix it.
    ServerMisconfigured { detail: String },
    /// The mail provider rejected the message or did not confirm it in time.
    SendFailed,
    ServerError,
}

#[derive(Serialize)]
pub struct ApiOk {
    pub ok: bool,
}
