use axum::{Json, extract::State};
use bazaar_core::NewAccount;
use serde::Serialize;
use tracing::{debug, info};

use super::middleware::ACCOUNT_DELETED;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
    extract::AppJson,
    response::{ApiResponse, OK},
};
use crate::users::requests::{LoginRequest, SignupRequest};

pub const WRONG_CREDENTIALS: &str = "Wrong credentials provided";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "Token")]
    pub token: String,
}

pub async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    request.validate()?;

    let password_digest = state.hasher.digest(&request.password);
    let id = state
        .accounts
        .create(NewAccount {
            username: request.username,
            password_digest,
            email: request.email,
            phone: request.phone,
            country_name: request.country,
        })
        .await?;

    info!(account_id = %id, "account signed up");
    Ok(Json(ApiResponse::success(OK)))
}

/// Unknown usernames and wrong passwords are indistinguishable to the
/// caller. The tombstone is only revealed to someone holding the password.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let account = state
        .accounts
        .get_by_username(&request.username)
        .await
        .map_err(|err| {
            debug!(error = %err, "login lookup failed");
            AppError::unauthorized(WRONG_CREDENTIALS)
        })?;

    if !state
        .hasher
        .matches(&request.password, &account.password_digest)
    {
        return Err(AppError::unauthorized(WRONG_CREDENTIALS));
    }

    if !account.is_active() {
        return Err(AppError::unauthorized(ACCOUNT_DELETED));
    }

    let token = state.tokens.issue_access(account.id)?;

    info!(account_id = %account.id, "access token issued");
    Ok(Json(ApiResponse::success(LoginResponse { token })))
}
