use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::EmailAddressError;
use crate::domain::email::models::parse_address_list;
use crate::domain::email::models::EmailMessage;
use crate::domain::email::models::EmailRecord;
use crate::domain::email::ports::EmailServicePort;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

pub async fn send_email(
    State(state): State<AppState>,
    Extension(session): Extension<AuthenticatedAccount>,
    Json(body): Json<SendEmailRequest>,
) -> Result<ApiSuccess<SendEmailResponseData>, ApiError> {
    let message = body.try_into_message()?;

    tracing::info!("Email send requested by {}", session.email);

    state
        .email_service
        .send(message)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::OK, record.into()))
}

/// HTTP request body for sending an email.
///
/// Recipient fields hold comma-separated address lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendEmailRequest {
    to: String,
    cc: Option<String>,
    bcc: Option<String>,
    subject: String,
    body: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSendEmailRequestError {
    #[error("{0}")]
    Recipient(#[from] EmailAddressError),
}

impl SendEmailRequest {
    fn try_into_message(self) -> Result<EmailMessage, ParseSendEmailRequestError> {
        let to = parse_address_list(&self.to)?;
        let cc = self
            .cc
            .as_deref()
            .map(parse_address_list)
            .transpose()?
            .unwrap_or_default();
        let bcc = self
            .bcc
            .as_deref()
            .map(parse_address_list)
            .transpose()?
            .unwrap_or_default();

        Ok(EmailMessage {
            to,
            cc,
            bcc,
            subject: self.subject,
            body: self.body,
        })
    }
}

impl From<ParseSendEmailRequestError> for ApiError {
    fn from(err: ParseSendEmailRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendEmailResponseData {
    pub id: String,
    pub sender: String,
    pub to_recipients: String,
    pub cc_recipients: Option<String>,
    pub bcc_recipients: Option<String>,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
}

impl From<&EmailRecord> for SendEmailResponseData {
    fn from(record: &EmailRecord) -> Self {
        Self {
            id: record.id.to_string(),
            sender: record.sender.as_str().to_string(),
            to_recipients: record.to_recipients.clone(),
            cc_recipients: record.cc_recipients.clone(),
            bcc_recipients: record.bcc_recipients.clone(),
            subject: record.subject.clone(),
            sent_at: record.sent_at,
        }
    }
}
