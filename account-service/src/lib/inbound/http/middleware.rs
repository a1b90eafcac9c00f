use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::account::models::AccountId;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated account identity through
/// request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: String,
}

/// Middleware that validates bearer tokens and attaches the decoded account
/// identity to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims: auth::Claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("Session token validation failed: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    let account_id_str = claims.sub.as_ref().ok_or_else(|| {
        tracing::error!("Missing 'sub' claim in token");
        unauthorized("Invalid token format")
    })?;

    let account_id = AccountId::from_string(account_id_str).map_err(|e| {
        tracing::error!("Failed to parse account ID from token: {}", e);
        unauthorized("Invalid token format")
    })?;

    let email = claims.email().unwrap_or_default();

    req.extensions_mut()
        .insert(AuthenticatedAccount { account_id, email });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("No token provided, authorization denied"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
    })
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "status": false,
            "message": message,
        })),
    )
        .into_response()
}
