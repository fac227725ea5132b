//! Role dashboards.

use axum::{extract::State, response::Json, Extension};

use crate::api::AppState;
use crate::domain::{AdminDashboard, Dashboard, Principal};
use crate::errors::AppResult;

/// Vendor or buyer dashboard, tagged by `role`
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard for the caller's role", body = Dashboard),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Dashboard>> {
    Ok(Json(state.services.dashboards().dashboard(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Platform metrics", body = AdminDashboard),
        (status = 403, description = "Staff only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<AdminDashboard>> {
    Ok(Json(
        state
            .services
            .dashboards()
            .admin_dashboard(&principal)
            .await?,
    ))
}
