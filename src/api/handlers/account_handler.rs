//! Company profile of the signed-in account.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::{AccountResponse, Principal, UpdateCompany};
use crate::errors::AppResult;

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[utoipa::path(
    get,
    path = "/account/profile",
    tag = "Account",
    responses(
        (status = 200, description = "Account and company", body = AccountResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<AccountResponse>> {
    Ok(Json(state.services.accounts().get_profile(&principal).await?))
}

/// Update company details; absent fields are left unchanged
#[utoipa::path(
    put,
    path = "/account/profile",
    tag = "Account",
    request_body = UpdateCompany,
    responses(
        (status = 200, description = "Profile updated", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UpdateCompany>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts()
        .update_profile(&principal, payload)
        .await?;
    Ok(Json(account))
}
