use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::AccountResponseData;
use super::ApiError;
use crate::account::errors::AccountError;
use crate::account::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<(StatusCode, Json<LoginResponseData>), ApiError> {
    // An empty email falls through to the phone number rather than
    // shadowing it.
    let identifier = body
        .email
        .filter(|s| !s.is_empty())
        .or(body.phone_no.filter(|s| !s.is_empty()))
        .ok_or_else(|| {
            ApiError::BadRequest("Email or phone number must be provided".to_string())
        })?;

    let password = body
        .password
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Password is required".to_string()))?;

    let account = state
        .account_service
        .login(LoginCommand {
            identifier,
            password,
        })
        .await
        .map_err(|e| match e {
            AccountError::InvalidCredentials => {
                ApiError::BadRequest("Invalid credentials".to_string())
            }
            _ => ApiError::from(e),
        })?;

    let claims = auth::Claims::for_account(
        account.id,
        account.email.as_str().to_string(),
        state.jwt_expiration_hours,
    );

    let token = state.authenticator.generate_token(&claims).map_err(|e| {
        ApiError::InternalServerError(format!("Token generation failed: {}", e))
    })?;

    Ok((
        StatusCode::OK,
        Json(LoginResponseData {
            status: true,
            message: "Login successful".to_string(),
            token,
            user: (&account).into(),
        }),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub status: bool,
    pub message: String,
    pub token: String,
    pub user: AccountResponseData,
}
