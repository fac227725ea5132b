//! Notifications and the unread badge.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::api::AppState;
use crate::domain::{Notification, Principal, UnreadCountResponse};
use crate::errors::AppResult;
use crate::types::{NotificationPage, PageQuery, Paginated, UpdatedResponse};

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read-all", post(mark_all_read))
}

/// Served with optional authentication
pub fn unread_count_routes() -> Router<AppState> {
    Router::new().route("/unread-count", get(unread_count))
}

/// Newest first; listing does not mark anything read
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "Notifications",
    params(PageQuery),
    responses((status = 200, description = "Notifications", body = NotificationPage)),
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<Notification>>> {
    Ok(Json(
        state
            .services
            .notifications()
            .list(&principal, page.page())
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    tag = "Notifications",
    responses((status = 200, description = "Number marked read", body = UpdatedResponse)),
    security(("bearer_auth" = []))
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<UpdatedResponse>> {
    let updated = state
        .services
        .notifications()
        .mark_all_read(&principal)
        .await?;
    Ok(Json(UpdatedResponse { updated }))
}

/// Unread messages plus notifications; `{"count": 0}` when anonymous
#[utoipa::path(
    get,
    path = "/notifications/unread-count",
    tag = "Notifications",
    responses((status = 200, description = "Unread counts", body = UnreadCountResponse))
)]
pub async fn unread_count(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
) -> AppResult<Json<UnreadCountResponse>> {
    let Some(Extension(principal)) = principal else {
        return Ok(Json(UnreadCountResponse::anonymous()));
    };
    let counts = state
        .services
        .notifications()
        .unread_counts(&principal)
        .await?;
    Ok(Json(UnreadCountResponse::Counts(counts)))
}
