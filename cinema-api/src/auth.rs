use axum::{extract::State, routing::post, Json, Router};
use cinema_account::{AccountOutcome, SignInForm, SignUpForm};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(sign_up))
        .route("/v1/auth/signin", post(sign_in))
        .route("/v1/auth/guest", post(guest))
        .route("/v1/auth/forgot-password", post(forgot_password))
}

/// POST /v1/auth/signup
async fn sign_up(
    State(state): State<AppState>,
    Json(form): Json<SignUpForm>,
) -> Result<Json<AccountOutcome>, AppError> {
    Ok(Json(state.accounts().register(&form).await?))
}

/// POST /v1/auth/signin
async fn sign_in(
    State(state): State<AppState>,
    Json(form): Json<SignInForm>,
) -> Result<Json<AccountOutcome>, AppError> {
    Ok(Json(state.accounts().authenticate(&form).await?))
}

/// POST /v1/auth/guest
/// Forget the signed-in user without creating an account
async fn guest(State(state): State<AppState>) -> Result<Json<AccountOutcome>, AppError> {
    Ok(Json(state.accounts().continue_as_guest().await?))
}

/// POST /v1/auth/forgot-password
/// Demo only, no mail is sent
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = state.accounts().request_password_reset(&req.email).await?;
    Ok(Json(MessageResponse { message }))
}
