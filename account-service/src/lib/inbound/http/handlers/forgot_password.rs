use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<ApiSuccess<ForgotPasswordResponseData>, ApiError> {
    // Unlike login, an unknown identifier surfaces as 404 here.
    state
        .account_service
        .request_password_reset(&body.identifier)
        .await
        .map_err(ApiError::from)
        .map(|issued| {
            ApiSuccess::new(
                StatusCode::OK,
                ForgotPasswordResponseData {
                    message: format!(
                        "Password reset token has been generated and sent to {}",
                        issued.email
                    ),
                    reset_token: issued.token,
                    expires_at: issued.expires_at,
                },
            )
        })
}

/// HTTP request body for requesting a password reset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordResponseData {
    pub message: String,
    /// The same token that was emailed out.
    pub reset_token: String,
    pub expires_at: DateTime<Utc>,
}
