use axum::extract::Path;
use axum::extract::State;
use axum::response::Redirect;

use crate::account::errors::AccountError;
use crate::inbound::http::router::AppState;

/// Consume a verification token and redirect to the frontend.
///
/// This flow never returns a JSON error to the client; every outcome is a
/// redirect carrying a `status`/`message` query pair.
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Redirect {
    let (status, message) = match state.account_service.confirm_email(&token).await {
        Ok(_) => ("success", "Email verified successfully".to_string()),
        Err(AccountError::VerificationTokenExpired) => {
            ("failed", "Verification token has expired".to_string())
        }
        Err(AccountError::InvalidVerificationToken) => {
            ("failed", "Invalid or expired token".to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Email verification failed unexpectedly");
            (
                "failed",
                "An error occurred during email verification".to_string(),
            )
        }
    };

    let url = format!(
        "{}/email-verification?status={}&message={}",
        state.frontend_url,
        status,
        urlencoding::encode(&message)
    );

    Redirect::temporary(&url)
}
