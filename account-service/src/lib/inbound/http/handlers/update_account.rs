use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::AccountResponseData;
use super::ApiError;
use crate::account::errors::AccountError;
use crate::account::models::AccountId;
use crate::account::models::AccountType;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::models::PhoneNumber;
use crate::account::models::UpdateAccountCommand;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating an account (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub fname: Option<String>,
    pub lname: Option<String>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub password: Option<String>,
    pub account_type: Option<String>,
}

impl UpdateAccountRequest {
    fn is_empty(&self) -> bool {
        self.fname.is_none()
            && self.lname.is_none()
            && self.email.is_none()
            && self.phone_no.is_none()
            && self.password.is_none()
            && self.account_type.is_none()
    }

    fn try_into_command(self) -> Result<UpdateAccountCommand, AccountError> {
        // Validation happens here - errors are converted via #[from]
        let email = self.email.map(EmailAddress::new).transpose()?;
        let phone = self.phone_no.map(PhoneNumber::new).transpose()?;
        let password = self.password.map(Password::new).transpose()?;
        let account_type = self
            .account_type
            .map(|s| s.parse::<AccountType>())
            .transpose()?;

        Ok(UpdateAccountCommand {
            first_name: self.fname,
            last_name: self.lname,
            email,
            phone,
            password,
            account_type,
        })
    }
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponseData>), ApiError> {
    let account_id = AccountId::from_string(&id)
        .map_err(AccountError::from)
        .map_err(ApiError::from)?;

    if req.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let command = req.try_into_command()?;

    state
        .account_service
        .update_account(&account_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref account| (StatusCode::OK, Json(account.into())))
}
