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

/// Directory-style create: any account type, no verification email.
pub async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let command = body.try_into_command()?;

    state.account_service.create_account(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Account created successfully")),
    ))
}

/// HTTP request body for creating an account directly (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAccountRequest {
    fname: String,
    lname: String,
    email: String,
    phone_no: String,
    password: String,
    account_type: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateAccountRequestError {
    #[error("All required fields must be provided")]
    MissingField,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneNumberError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),

    #[error("{0}")]
    AccountType(#[from] AccountTypeError),
}

impl CreateAccountRequest {
    fn try_into_command(self) -> Result<NewAccountCommand, ParseCreateAccountRequestError> {
        if self.fname.trim().is_empty() || self.lname.trim().is_empty() {
            return Err(ParseCreateAccountRequestError::MissingField);
        }

        let email = EmailAddress::new(self.email)?;
        let phone = PhoneNumber::new(self.phone_no)?;
        let password = Password::new(self.password)?;
        let account_type: AccountType = self.account_type.parse()?;

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

impl From<ParseCreateAccountRequestError> for ApiError {
    fn from(err: ParseCreateAccountRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
