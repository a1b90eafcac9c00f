use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::account::errors::AccountError;
use crate::account::models::Account;

pub mod create_account;
pub mod delete_account;
pub mod get_account;
pub mod list_accounts;
pub mod login;
pub mod register;
pub mod update_account;
pub mod verify_email;

/// Public projection of an account.
///
/// This is the only shape that crosses the HTTP boundary; the password
/// digest and verification token never appear in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResponseData {
    pub id: String,
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub phone_no: String,
    pub account_type: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponseData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            fname: account.first_name.clone(),
            lname: account.last_name.clone(),
            email: account.email.as_str().to_string(),
            phone_no: account.phone.as_str().to_string(),
            account_type: account.account_type.to_string(),
            email_verified: account.email_verified,
            created_at: account.created_at,
        }
    }
}

/// Uniform `{status, message}` body for message-only success responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub status: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
        }
    }
}

/// Error at the HTTP boundary.
///
/// Every domain error is converted here and rendered as a JSON
/// `{status: false, message}` body; nothing propagates uncaught to the
/// transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    DeliveryFailure(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::DeliveryFailure(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (
            status,
            Json(json!({
                "status": false,
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidAccountId(_)
            | AccountError::InvalidEmail(_)
            | AccountError::InvalidPhoneNumber(_)
            | AccountError::InvalidPassword(_)
            | AccountError::InvalidAccountType(_)
            | AccountError::InvalidVerificationToken
            | AccountError::VerificationTokenExpired => ApiError::BadRequest(err.to_string()),

            // Duplicate unique fields report as plain bad requests on this
            // API surface.
            AccountError::EmailAlreadyExists(_) | AccountError::PhoneAlreadyExists(_) => {
                ApiError::BadRequest(err.to_string())
            }

            AccountError::InvalidCredentials => ApiError::BadRequest(err.to_string()),

            AccountError::EmailNotVerified => {
                ApiError::Forbidden("Please verify your email to continue".to_string())
            }

            AccountError::NotFound(_) => ApiError::NotFound("Account not found".to_string()),

            AccountError::MailDelivery(_) => ApiError::DeliveryFailure(
                "Failed to send verification email. Please try again later.".to_string(),
            ),

            AccountError::DatabaseError(_) | AccountError::Unknown(_) => {
                tracing::error!(error = %err, "Unexpected error at handler boundary");
                ApiError::InternalServerError("An unexpected error occurred".to_string())
            }
        }
    }
}
