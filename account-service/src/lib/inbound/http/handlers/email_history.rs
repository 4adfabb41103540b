use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::email::models::EmailRecord;
use crate::domain::email::ports::EmailServicePort;
use crate::inbound::http::router::AppState;

pub async fn email_history(
    State(state): State<AppState>,
    Query(params): Query<EmailHistoryParams>,
) -> Result<ApiSuccess<Vec<EmailRecordData>>, ApiError> {
    state
        .email_service
        .history(params.days)
        .await
        .map_err(ApiError::from)
        .map(|records| {
            let data = records.iter().map(EmailRecordData::from).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

/// Query parameters for the history listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailHistoryParams {
    /// Look-back window in days; omit to list everything
    days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRecordData {
    pub id: String,
    pub sender: String,
    pub to_recipients: String,
    pub cc_recipients: Option<String>,
    pub bcc_recipients: Option<String>,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl From<&EmailRecord> for EmailRecordData {
    fn from(record: &EmailRecord) -> Self {
        Self {
            id: record.id.to_string(),
            sender: record.sender.as_str().to_string(),
            to_recipients: record.to_recipients.clone(),
            cc_recipients: record.cc_recipients.clone(),
            bcc_recipients: record.bcc_recipients.clone(),
            subject: record.subject.clone(),
            body: record.body.clone(),
            sent_at: record.sent_at,
        }
    }
}
