use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::AccountResponseData;
use super::ApiError;
use crate::inbound::http::router::AppState;

pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<AccountResponseData>>), ApiError> {
    let accounts = state.account_service.list_accounts().await?;

    let data = accounts.iter().map(AccountResponseData::from).collect();

    Ok((StatusCode::OK, Json(data)))
}
