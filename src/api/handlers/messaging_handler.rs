//! Conversation inbox and messages.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{ConversationDetail, ConversationSummary, Message, NewMessage, Principal};
use crate::errors::AppResult;
use crate::types::{ConversationPage, Created, PageQuery, Paginated};

pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_conversations))
        .route("/:id", get(get_conversation))
        .route("/:id/messages", post(send_message))
}

#[utoipa::path(
    get,
    path = "/conversations",
    tag = "Messaging",
    params(PageQuery),
    responses((status = 200, description = "Most recently active first", body = ConversationPage)),
    security(("bearer_auth" = []))
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ConversationSummary>>> {
    Ok(Json(
        state
            .services
            .messaging()
            .conversations(&principal, page.page())
            .await?,
    ))
}

/// Open a conversation; messages from the other side are marked read
#[utoipa::path(
    get,
    path = "/conversations/{id}",
    tag = "Messaging",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation with messages oldest first", body = ConversationDetail),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Conversation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ConversationDetail>> {
    Ok(Json(
        state
            .services
            .messaging()
            .conversation(&principal, id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/conversations/{id}/messages",
    tag = "Messaging",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    request_body = NewMessage,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Empty message"),
        (status = 403, description = "Not a participant")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewMessage>,
) -> AppResult<Created<Message>> {
    let message = state
        .services
        .messaging()
        .send_message(&principal, id, payload)
        .await?;
    Ok(Created(message))
}
