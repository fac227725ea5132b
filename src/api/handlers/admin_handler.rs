//! Staff-only administration. Each service call checks `is_staff`.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::dashboard_handler::admin_dashboard;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Category, Company, ContactInquiry, HeroImage, Industry, NewCategory, NewHeroImage,
    NewIndustry, NewTestimonial, Principal, SiteSettings, SubscriptionStatus, Testimonial,
    UpdateSiteSettings,
};
use crate::errors::AppResult;
use crate::types::{Created, InquiryPage, PageQuery, Paginated};

/// Subscription change reported by the payment step
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscriptionUpdate {
    pub status: SubscriptionStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerificationUpdate {
    pub verified: bool,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin_dashboard))
        .route("/companies/:id/subscription", put(set_subscription))
        .route("/companies/:id/verification", put(set_verification))
        .route("/industries", post(create_industry))
        .route("/categories", post(create_category))
        .route("/hero-images", post(create_hero_image))
        .route("/testimonials", post(create_testimonial))
        .route("/settings", put(update_site_settings))
        .route("/inquiries", get(list_inquiries))
        .route("/inquiries/:id/responded", post(mark_inquiry_responded))
}

/// Set a company's subscription status
///
/// `active` stamps the start date; `expired` and `cancelled` stamp the end date.
#[utoipa::path(
    put,
    path = "/admin/companies/{id}/subscription",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Company ID")),
    request_body = SubscriptionUpdate,
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_subscription(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubscriptionUpdate>,
) -> AppResult<Json<Company>> {
    Ok(Json(
        state
            .services
            .accounts()
            .set_subscription(&principal, id, payload.status)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/admin/companies/{id}/verification",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Company ID")),
    request_body = VerificationUpdate,
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_verification(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerificationUpdate>,
) -> AppResult<Json<Company>> {
    Ok(Json(
        state
            .services
            .accounts()
            .set_verified(&principal, id, payload.verified)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/admin/industries",
    tag = "Admin",
    request_body = NewIndustry,
    responses(
        (status = 201, description = "Industry created", body = Industry),
        (status = 409, description = "Slug already used")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_industry(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<NewIndustry>,
) -> AppResult<Created<Industry>> {
    let industry = state
        .services
        .catalog()
        .create_industry(&principal, payload)
        .await?;
    Ok(Created(industry))
}

#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "Admin",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Parent not allowed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<NewCategory>,
) -> AppResult<Created<Category>> {
    let category = state
        .services
        .catalog()
        .create_category(&principal, payload)
        .await?;
    Ok(Created(category))
}

#[utoipa::path(
    post,
    path = "/admin/hero-images",
    tag = "Admin",
    request_body = NewHeroImage,
    responses((status = 201, description = "Carousel image added", body = HeroImage)),
    security(("bearer_auth" = []))
)]
pub async fn create_hero_image(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<NewHeroImage>,
) -> AppResult<Created<HeroImage>> {
    let hero = state
        .services
        .content()
        .create_hero_image(&principal, payload)
        .await?;
    Ok(Created(hero))
}

#[utoipa::path(
    post,
    path = "/admin/testimonials",
    tag = "Admin",
    request_body = NewTestimonial,
    responses((status = 201, description = "Testimonial added", body = Testimonial)),
    security(("bearer_auth" = []))
)]
pub async fn create_testimonial(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<NewTestimonial>,
) -> AppResult<Created<Testimonial>> {
    let testimonial = state
        .services
        .content()
        .create_testimonial(&principal, payload)
        .await?;
    Ok(Created(testimonial))
}

#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "Admin",
    request_body = UpdateSiteSettings,
    responses((status = 200, description = "Settings saved", body = SiteSettings)),
    security(("bearer_auth" = []))
)]
pub async fn update_site_settings(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<UpdateSiteSettings>,
) -> AppResult<Json<SiteSettings>> {
    Ok(Json(
        state
            .services
            .content()
            .update_site_settings(&principal, payload)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/admin/inquiries",
    tag = "Admin",
    params(PageQuery),
    responses((status = 200, description = "Contact inquiries, newest first", body = InquiryPage)),
    security(("bearer_auth" = []))
)]
pub async fn list_inquiries(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ContactInquiry>>> {
    Ok(Json(
        state
            .services
            .content()
            .list_inquiries(&principal, page.page())
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/admin/inquiries/{id}/responded",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 200, description = "Inquiry marked responded", body = ContactInquiry),
        (status = 404, description = "Inquiry not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_inquiry_responded(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContactInquiry>> {
    Ok(Json(
        state
            .services
            .content()
            .mark_inquiry_responded(&principal, id)
            .await?,
    ))
}
