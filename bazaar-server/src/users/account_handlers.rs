use axum::{Extension, Json, extract::State};
use bazaar_core::AccountChanges;
use tracing::info;

use super::auth::AuthenticatedAccount;
use super::requests::{UpdateAccountRequest, UpdatePasswordRequest};
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::AppJson,
    response::{ApiResponse, OK},
};

pub async fn update_account(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(account_id)): Extension<AuthenticatedAccount>,
    AppJson(request): AppJson<UpdateAccountRequest>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    request.validate()?;

    let changes = AccountChanges::from_fields(request.email, request.phone, request.country);
    state.accounts.update(account_id, changes).await?;

    info!(%account_id, "account updated");
    Ok(Json(ApiResponse::success(OK)))
}

pub async fn update_password(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(account_id)): Extension<AuthenticatedAccount>,
    AppJson(request): AppJson<UpdatePasswordRequest>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    request.validate()?;

    let digest = state.hasher.digest(&request.new_password);
    state.accounts.update_password(account_id, digest).await?;

    info!(%account_id, "password changed");
    Ok(Json(ApiResponse::success(OK)))
}

/// The account stays in place; only its ledger is tombstoned.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(AuthenticatedAccount(account_id)): Extension<AuthenticatedAccount>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    state.accounts.soft_delete(account_id).await?;

    info!(%account_id, "account deleted");
    Ok(Json(ApiResponse::success(OK)))
}
