use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use super::MessageResponse;
use crate::account::models::AccountId;
use crate::inbound::http::router::AppState;

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let account_id =
        AccountId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .account_service
        .delete_account(&account_id)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            (
                StatusCode::OK,
                Json(MessageResponse::new("Account deleted successfully")),
            )
        })
}
