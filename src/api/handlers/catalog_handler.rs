//! Catalog browsing and vendor product management.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Category, Industry, IndustryOverview, Principal, Product, ProductDetail, ProductFilter,
    ProductInput,
};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, PageQuery, Paginated, ProductPage};

/// `?industry=` filter for the category list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    pub industry: Option<Uuid>,
}

/// `?search=&page=` for the vendor's own listings
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MyProductsQuery {
    /// Matches name or description
    pub search: Option<String>,
    pub page: Option<u64>,
}

/// Public catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/industries", get(list_industries))
        .route("/industries/overview", get(industry_overview))
        .route("/industries/:slug", get(get_industry))
        .route("/categories", get(list_categories))
        .route("/categories/:id/products", get(category_products))
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

/// Product management for the signed-in vendor
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(my_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/industries",
    tag = "Catalog",
    responses((status = 200, description = "Active industries", body = [Industry]))
)]
pub async fn list_industries(State(state): State<AppState>) -> AppResult<Json<Vec<Industry>>> {
    Ok(Json(state.services.catalog().list_industries().await?))
}

/// Every industry with its category tree and stats
#[utoipa::path(
    get,
    path = "/industries/overview",
    tag = "Catalog",
    responses((status = 200, description = "Industry overview", body = [IndustryOverview]))
)]
pub async fn industry_overview(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<IndustryOverview>>> {
    Ok(Json(state.services.catalog().industry_overview().await?))
}

#[utoipa::path(
    get,
    path = "/industries/{slug}",
    tag = "Catalog",
    params(("slug" = String, Path, description = "Industry slug")),
    responses(
        (status = 200, description = "Industry with categories", body = IndustryOverview),
        (status = 404, description = "Unknown or inactive industry")
    )
)]
pub async fn get_industry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<IndustryOverview>> {
    Ok(Json(state.services.catalog().industry(&slug).await?))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    params(CategoryQuery),
    responses((status = 200, description = "Active categories", body = [Category]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(
        state.services.catalog().list_categories(query.industry).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/categories/{id}/products",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Category ID"), PageQuery),
    responses(
        (status = 200, description = "Active products in the category", body = ProductPage),
        (status = 404, description = "Unknown or inactive category")
    )
)]
pub async fn category_products(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    Ok(Json(
        state
            .services
            .catalog()
            .category_products(id, page.page())
            .await?,
    ))
}

/// Active products, newest first; filters are AND-combined
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(ProductFilter, PageQuery),
    responses((status = 200, description = "Matching products", body = ProductPage))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    Ok(Json(
        state
            .services
            .catalog()
            .list_products(filter, page.page())
            .await?,
    ))
}

/// Product page; each call counts one view
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product with related listings", body = ProductDetail),
        (status = 404, description = "Unknown or inactive product")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductDetail>> {
    Ok(Json(state.services.catalog().product_detail(id).await?))
}

#[utoipa::path(
    get,
    path = "/vendor/products",
    tag = "Vendor",
    params(MyProductsQuery),
    responses(
        (status = 200, description = "The vendor's products", body = ProductPage),
        (status = 402, description = "Subscription inactive"),
        (status = 403, description = "Not a vendor")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_products(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<MyProductsQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    let page = PageQuery { page: query.page }.page();
    Ok(Json(
        state
            .services
            .catalog()
            .my_products(&principal, query.search, page)
            .await?,
    ))
}

/// Publish a product, or keep it as a draft with `save_draft`
#[utoipa::path(
    post,
    path = "/vendor/products",
    tag = "Vendor",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 402, description = "Subscription inactive"),
        (status = 403, description = "Not a vendor")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<ProductInput>,
) -> AppResult<Created<Product>> {
    let product = state
        .services
        .catalog()
        .create_product(&principal, payload)
        .await?;
    Ok(Created(product))
}

#[utoipa::path(
    put,
    path = "/vendor/products/{id}",
    tag = "Vendor",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not one of the vendor's products")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProductInput>,
) -> AppResult<Json<Product>> {
    Ok(Json(
        state
            .services
            .catalog()
            .update_product(&principal, id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/vendor/products/{id}",
    tag = "Vendor",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Not one of the vendor's products")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .services
        .catalog()
        .delete_product(&principal, id)
        .await?;
    Ok(NoContent)
}
