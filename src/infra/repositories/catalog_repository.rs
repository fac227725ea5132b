//! Industries, categories and products.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select, Set,
};
use uuid::Uuid;

use super::base::{self, contains_ci};
use super::entities::{
    category::{self, Entity as CategoryEntity},
    industry::{self, Entity as IndustryEntity},
    product::{self, encode_images, Entity as ProductEntity},
};
use crate::domain::media::{max_bound_minor_units, min_bound_minor_units};
use crate::domain::{
    Category, Industry, IndustryStats, NewCategory, Product, ProductFilter, ProductStatus,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Industry row to insert
#[derive(Debug, Clone)]
pub struct NewIndustryRecord {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: String,
    pub image: String,
    pub display_order: i32,
}

/// Product fields written on create and on every edit
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price_minor: i64,
    pub currency: String,
    pub minimum_order_quantity: String,
    pub lead_time: String,
    pub images: Vec<String>,
    pub tags: String,
    pub status: ProductStatus,
}

/// Catalog repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // --- industries ---

    /// Active industries ordered by display order, then name
    async fn list_industries(&self) -> AppResult<Vec<Industry>>;

    async fn find_industry(&self, id: Uuid) -> AppResult<Option<Industry>>;

    async fn find_industry_by_slug(&self, slug: &str) -> AppResult<Option<Industry>>;

    async fn create_industry(&self, record: NewIndustryRecord) -> AppResult<Industry>;

    async fn count_active_industries(&self) -> AppResult<u64>;

    /// Category, product and supplier counts for one industry (active rows only)
    async fn industry_stats(&self, industry_id: Uuid) -> AppResult<IndustryStats>;

    /// Products in the industry, any status
    async fn count_industry_products(&self, industry_id: Uuid) -> AppResult<u64>;

    // --- categories ---

    /// Active categories, optionally restricted to one industry, by name
    async fn list_categories(&self, industry_id: Option<Uuid>) -> AppResult<Vec<Category>>;

    async fn find_category(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn create_category(&self, input: NewCategory) -> AppResult<Category>;

    // --- products ---

    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Product id -> name for the given ids
    async fn product_names(&self, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, String>>;

    /// Public listing: active products matching every filter, newest first
    async fn search_products(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Active products of one category, newest first
    async fn category_products(
        &self,
        category_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Atomic `views_count + 1`
    async fn increment_views(&self, id: Uuid) -> AppResult<()>;

    /// Other active products in the same category
    async fn related_products(&self, category_id: Uuid, exclude: Uuid, limit: u64) -> AppResult<Vec<Product>>;

    /// Other active products of the same company
    async fn more_from_company(&self, company_id: Uuid, exclude: Uuid, limit: u64) -> AppResult<Vec<Product>>;

    /// Every product of a company (any status), optional name/description search
    async fn company_products(
        &self,
        company_id: Uuid,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    async fn create_product(&self, company_id: Uuid, record: ProductRecord) -> AppResult<Product>;

    async fn update_product(&self, id: Uuid, record: ProductRecord) -> AppResult<Product>;

    async fn delete_product(&self, id: Uuid) -> AppResult<()>;

    // --- reporting ---

    async fn count_products(
        &self,
        company_id: Option<Uuid>,
        status: Option<ProductStatus>,
    ) -> AppResult<u64>;

    async fn count_products_since(&self, since: DateTime<Utc>) -> AppResult<u64>;

    async fn company_total_views(&self, company_id: Uuid) -> AppResult<i64>;

    /// Newest first, optional owner/status filters and creation cutoff
    async fn recent_products(
        &self,
        company_id: Option<Uuid>,
        status: Option<ProductStatus>,
        since: Option<DateTime<Utc>>,
        limit: u64,
    ) -> AppResult<Vec<Product>>;
}

/// Concrete implementation of CatalogRepository
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn active_products() -> Select<ProductEntity> {
        ProductEntity::find().filter(product::Column::Status.eq(ProductStatus::Active.as_str()))
    }

    fn industry_category_ids(industry_id: Uuid) -> sea_orm::sea_query::SelectStatement {
        CategoryEntity::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::IndustryId.eq(industry_id))
            .into_query()
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn list_industries(&self) -> AppResult<Vec<Industry>> {
        let models = IndustryEntity::find()
            .filter(industry::Column::IsActive.eq(true))
            .order_by_asc(industry::Column::DisplayOrder)
            .order_by_asc(industry::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Industry::from).collect())
    }

    async fn find_industry(&self, id: Uuid) -> AppResult<Option<Industry>> {
        let model = IndustryEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Industry::from))
    }

    async fn find_industry_by_slug(&self, slug: &str) -> AppResult<Option<Industry>> {
        let model = IndustryEntity::find()
            .filter(industry::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(model.map(Industry::from))
    }

    async fn create_industry(&self, record: NewIndustryRecord) -> AppResult<Industry> {
        let model = industry::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(record.name),
            slug: Set(record.slug),
            description: Set(record.description),
            icon: Set(record.icon),
            image: Set(record.image),
            is_active: Set(true),
            display_order: Set(record.display_order),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(Industry::from(model))
    }

    async fn count_active_industries(&self) -> AppResult<u64> {
        base::count(
            &self.db,
            IndustryEntity::find().filter(industry::Column::IsActive.eq(true)),
        )
        .await
    }

    async fn industry_stats(&self, industry_id: Uuid) -> AppResult<IndustryStats> {
        let active_categories = base::count(
            &self.db,
            CategoryEntity::find()
                .filter(category::Column::IndustryId.eq(industry_id))
                .filter(category::Column::IsActive.eq(true)),
        )
        .await?;

        let in_industry = product::Column::CategoryId.in_subquery(Self::industry_category_ids(industry_id));

        let total_products = base::count(
            &self.db,
            Self::active_products().filter(in_industry.clone()),
        )
        .await?;

        let suppliers: Vec<Uuid> = Self::active_products()
            .filter(in_industry)
            .select_only()
            .column(product::Column::CompanyId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(IndustryStats {
            active_categories,
            total_products,
            active_suppliers: suppliers.len() as u64,
        })
    }

    async fn count_industry_products(&self, industry_id: Uuid) -> AppResult<u64> {
        base::count(
            &self.db,
            ProductEntity::find().filter(
                product::Column::CategoryId.in_subquery(Self::industry_category_ids(industry_id)),
            ),
        )
        .await
    }

    async fn list_categories(&self, industry_id: Option<Uuid>) -> AppResult<Vec<Category>> {
        let mut query = CategoryEntity::find().filter(category::Column::IsActive.eq(true));
        if let Some(industry_id) = industry_id {
            query = query.filter(category::Column::IndustryId.eq(industry_id));
        }
        let models = query
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        let model = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Category::from))
    }

    async fn create_category(&self, input: NewCategory) -> AppResult<Category> {
        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            industry_id: Set(input.industry_id),
            parent_id: Set(input.parent_id),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(Category::from(model))
    }

    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let model = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn product_names(&self, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, String)> = ProductEntity::find()
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Name)
            .filter(product::Column::Id.is_in(ids))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn search_products(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut query = Self::active_products();

        if let Some(text) = filter.search_text() {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(product::Column::Name, text))
                    .add(contains_ci(product::Column::Description, text))
                    .add(contains_ci(product::Column::Tags, text)),
            );
        }
        if let Some(category_id) = filter.category {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(industry_id) = filter.industry {
            query = query.filter(
                product::Column::CategoryId.in_subquery(Self::industry_category_ids(industry_id)),
            );
        }
        if let Some(min) = filter.min_price {
            query = query.filter(product::Column::PriceMinor.gte(min_bound_minor_units(min)?));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(product::Column::PriceMinor.lte(max_bound_minor_units(max)?));
        }

        let query = query.order_by_desc(product::Column::CreatedAt);
        let (models, total) = base::fetch_page(&self.db, query, &params).await?;
        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn category_products(
        &self,
        category_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let query = Self::active_products()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_desc(product::Column::CreatedAt);
        let (models, total) = base::fetch_page(&self.db, query, &params).await?;
        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<()> {
        ProductEntity::update_many()
            .col_expr(
                product::Column::ViewsCount,
                Expr::col(product::Column::ViewsCount).add(1),
            )
            .filter(product::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn related_products(&self, category_id: Uuid, exclude: Uuid, limit: u64) -> AppResult<Vec<Product>> {
        let models = Self::active_products()
            .filter(product::Column::CategoryId.eq(category_id))
            .filter(product::Column::Id.ne(exclude))
            .order_by_desc(product::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn more_from_company(&self, company_id: Uuid, exclude: Uuid, limit: u64) -> AppResult<Vec<Product>> {
        let models = Self::active_products()
            .filter(product::Column::CompanyId.eq(company_id))
            .filter(product::Column::Id.ne(exclude))
            .order_by_desc(product::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn company_products(
        &self,
        company_id: Uuid,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut query = ProductEntity::find().filter(product::Column::CompanyId.eq(company_id));
        if let Some(text) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(product::Column::Name, text))
                    .add(contains_ci(product::Column::Description, text)),
            );
        }
        let query = query.order_by_desc(product::Column::CreatedAt);
        let (models, total) = base::fetch_page(&self.db, query, &params).await?;
        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn create_product(&self, company_id: Uuid, record: ProductRecord) -> AppResult<Product> {
        let now = Utc::now();
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            category_id: Set(record.category_id),
            name: Set(record.name),
            description: Set(record.description),
            price_minor: Set(record.price_minor),
            currency: Set(record.currency),
            minimum_order_quantity: Set(record.minimum_order_quantity),
            lead_time: Set(record.lead_time),
            images: Set(encode_images(&record.images)),
            tags: Set(record.tags),
            status: Set(record.status.as_str().to_string()),
            featured: Set(false),
            views_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(Product::from(model))
    }

    async fn update_product(&self, id: Uuid, record: ProductRecord) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = model.into();
        active.category_id = Set(record.category_id);
        active.name = Set(record.name);
        active.description = Set(record.description);
        active.price_minor = Set(record.price_minor);
        active.currency = Set(record.currency);
        active.minimum_order_quantity = Set(record.minimum_order_quantity);
        active.lead_time = Set(record.lead_time);
        active.images = Set(encode_images(&record.images));
        active.tags = Set(record.tags);
        active.status = Set(record.status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn count_products(
        &self,
        company_id: Option<Uuid>,
        status: Option<ProductStatus>,
    ) -> AppResult<u64> {
        let mut query = ProductEntity::find();
        if let Some(company_id) = company_id {
            query = query.filter(product::Column::CompanyId.eq(company_id));
        }
        if let Some(status) = status {
            query = query.filter(product::Column::Status.eq(status.as_str()));
        }
        base::count(&self.db, query).await
    }

    async fn count_products_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        base::count(
            &self.db,
            ProductEntity::find().filter(product::Column::CreatedAt.gte(since)),
        )
        .await
    }

    async fn company_total_views(&self, company_id: Uuid) -> AppResult<i64> {
        let views: Vec<i64> = ProductEntity::find()
            .select_only()
            .column(product::Column::ViewsCount)
            .filter(product::Column::CompanyId.eq(company_id))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(views.into_iter().sum())
    }

    async fn recent_products(
        &self,
        company_id: Option<Uuid>,
        status: Option<ProductStatus>,
        since: Option<DateTime<Utc>>,
        limit: u64,
    ) -> AppResult<Vec<Product>> {
        let mut query = ProductEntity::find();
        if let Some(company_id) = company_id {
            query = query.filter(product::Column::CompanyId.eq(company_id));
        }
        if let Some(status) = status {
            query = query.filter(product::Column::Status.eq(status.as_str()));
        }
        if let Some(since) = since {
            query = query.filter(product::Column::CreatedAt.gte(since));
        }
        let models = query
            .order_by_desc(product::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }
}
