use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::MessageResponse;
use crate::account::errors::AccountTypeError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordError;
use crate::account::errors::PhoneNumberError;
use crate::account::models::AccountType;
use crate::account::models::EmailAddress;
use crate::account::models::NewAccountCommand;
use crate::account::models::Password;
use crate::account::models::PhoneNumber;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let command = body.try_into_command()?;

    state.account_service.register(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Account registered successfully. Please check your email to verify your account.",
        )),
    ))
}

/// HTTP request body for self-service registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    fname: String,
    lname: String,
    email: String,
    phone_no: String,
    password: String,
    account_type: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("All fields are required.")]
    MissingField,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneNumberError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),

    #[error("Invalid account type.")]
    AccountType,
}

impl From<AccountTypeError> for ParseRegisterRequestError {
    fn from(_: AccountTypeError) -> Self {
        ParseRegisterRequestError::AccountType
    }
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<NewAccountCommand, ParseRegisterRequestError> {
        if self.fname.trim().is_empty() || self.lname.trim().is_empty() {
            return Err(ParseRegisterRequestError::MissingField);
        }

        let email = EmailAddress::new(self.email)?;
        let phone = PhoneNumber::new(self.phone_no)?;
        let password = Password::new(self.password)?;
        let account_type: AccountType = self.account_type.parse()?;

        // Admin accounts cannot be self-registered.
        if !account_type.is_self_registrable() {
            return Err(ParseRegisterRequestError::AccountType);
        }

        Ok(NewAccountCommand {
            first_name: self.fname,
            last_name: self.lname,
            email,
            phone,
            password,
            account_type,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
