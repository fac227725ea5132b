//! Public marketing pages and the contact form.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{ContactInquiry, HomePage, NewContactInquiry, PricingPage, SiteSettings};
use crate::errors::AppResult;
use crate::types::Created;

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/pricing", get(pricing))
        .route("/settings", get(site_settings))
        .route("/contact", post(submit_contact))
}

#[utoipa::path(
    get,
    path = "/site/home",
    tag = "Site",
    responses((status = 200, description = "Home page content", body = HomePage))
)]
pub async fn home(State(state): State<AppState>) -> AppResult<Json<HomePage>> {
    Ok(Json(state.services.content().home().await?))
}

#[utoipa::path(
    get,
    path = "/site/pricing",
    tag = "Site",
    responses((status = 200, description = "Vendor subscription pricing", body = PricingPage))
)]
pub async fn pricing(State(state): State<AppState>) -> AppResult<Json<PricingPage>> {
    Ok(Json(state.services.content().pricing().await?))
}

#[utoipa::path(
    get,
    path = "/site/settings",
    tag = "Site",
    responses((status = 200, description = "Site settings", body = SiteSettings))
)]
pub async fn site_settings(State(state): State<AppState>) -> AppResult<Json<SiteSettings>> {
    Ok(Json(state.services.content().site_settings().await?))
}

#[utoipa::path(
    post,
    path = "/site/contact",
    tag = "Site",
    request_body = NewContactInquiry,
    responses(
        (status = 201, description = "Inquiry received", body = ContactInquiry),
        (status = 400, description = "Validation error")
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewContactInquiry>,
) -> AppResult<Created<ContactInquiry>> {
    let inquiry = state.services.content().submit_inquiry(payload).await?;
    Ok(Created(inquiry))
}
