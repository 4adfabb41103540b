use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::PasswordPolicyError;
use crate::domain::account::models::Password;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<ResetPasswordResponseData>, ApiError> {
    // Policy violations are reported before the token is spent, so a 422
    // leaves the token redeemable.
    let new_password = body.parse_new_password()?;

    state
        .account_service
        .redeem_password_reset(&body.token, new_password)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                ResetPasswordResponseData {
                    message: "Password has been successfully reset".to_string(),
                },
            )
        })
}

/// HTTP request body for redeeming a password-reset token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    token: String,
    new_password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseResetPasswordRequestError {
    #[error("{0}")]
    Password(#[from] PasswordPolicyError),
}

impl ResetPasswordRequest {
    fn parse_new_password(&self) -> Result<Password, ParseResetPasswordRequestError> {
        Ok(Password::new(self.new_password.clone())?)
    }
}

impl From<ParseResetPasswordRequestError> for ApiError {
    fn from(err: ParseResetPasswordRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetPasswordResponseData {
    pub message: String,
}
