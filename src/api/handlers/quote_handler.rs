//! Quote requests and supplier responses.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{NewQuoteRequest, Principal, QuoteRequest, QuoteResponseInput, QuoteSummary};
use crate::errors::AppResult;
use crate::types::{Created, PageQuery, Paginated, QuotePage};

pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route("/products/:id/quotes", post(request_quote))
        .route("/quotes/received", get(received_quotes))
        .route("/quotes/sent", get(sent_quotes))
        .route("/quotes/:id/respond", post(respond_to_quote))
        .route("/quotes/:id/close", post(close_quote))
}

/// Request a quote on another company's product
///
/// Opens a conversation with the supplier and notifies them.
#[utoipa::path(
    post,
    path = "/products/{id}/quotes",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = NewQuoteRequest,
    responses(
        (status = 201, description = "Quote requested", body = QuoteRequest),
        (status = 400, description = "Validation error"),
        (status = 402, description = "Subscription inactive"),
        (status = 404, description = "Unknown or inactive product"),
        (status = 422, description = "Quote on own product")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_quote(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewQuoteRequest>,
) -> AppResult<Created<QuoteRequest>> {
    let quote = state
        .services
        .quotes()
        .request_quote(&principal, product_id, payload)
        .await?;
    Ok(Created(quote))
}

#[utoipa::path(
    get,
    path = "/quotes/received",
    tag = "Quotes",
    params(PageQuery),
    responses((status = 200, description = "Quotes received as supplier", body = QuotePage)),
    security(("bearer_auth" = []))
)]
pub async fn received_quotes(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<QuoteSummary>>> {
    Ok(Json(
        state
            .services
            .quotes()
            .received_quotes(&principal, page.page())
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/quotes/sent",
    tag = "Quotes",
    params(PageQuery),
    responses((status = 200, description = "Quotes sent as requester", body = QuotePage)),
    security(("bearer_auth" = []))
)]
pub async fn sent_quotes(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<QuoteSummary>>> {
    Ok(Json(
        state
            .services
            .quotes()
            .sent_quotes(&principal, page.page())
            .await?,
    ))
}

/// Supplier answers a quote: responded, accepted or declined
#[utoipa::path(
    post,
    path = "/quotes/{id}/respond",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = QuoteResponseInput,
    responses(
        (status = 200, description = "Quote updated", body = QuoteRequest),
        (status = 400, description = "Status not allowed"),
        (status = 403, description = "Only the supplier may respond"),
        (status = 404, description = "Quote not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn respond_to_quote(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<QuoteResponseInput>,
) -> AppResult<Json<QuoteRequest>> {
    Ok(Json(
        state
            .services
            .quotes()
            .respond(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/quotes/{id}/close",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote closed", body = QuoteRequest),
        (status = 400, description = "Already closed"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Quote not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn close_quote(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuoteRequest>> {
    Ok(Json(state.services.quotes().close(&principal, id).await?))
}
