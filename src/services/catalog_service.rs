//! Catalog service - industries, categories and product listings.
//!
//! Public reads only ever see active rows. Product management sits behind
//! the vendor guards: role first (hard denial), then subscription (sent to
//! the pricing page).

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{
    CATALOG_PAGE_SIZE, COMPANY_PRODUCTS_LIMIT, DEFAULT_CURRENCY, MAX_IMAGES_ON_CREATE,
    MY_PRODUCTS_PAGE_SIZE, RELATED_PRODUCTS_LIMIT, SUPPORTED_CURRENCIES,
};
use crate::domain::catalog::{merge_images, slugify};
use crate::domain::media::{into_data_uris, to_minor_units};
use crate::domain::{
    Category, CategoryTree, Industry, IndustryOverview, NewCategory, NewIndustry, Principal,
    Product, ProductDetail, ProductFilter, ProductInput, ProductStatus, SupplierSummary,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{NewIndustryRecord, ProductRecord};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Active industries by display order, then name
    async fn list_industries(&self) -> AppResult<Vec<Industry>>;

    /// Every active industry with its category tree and stats
    async fn industry_overview(&self) -> AppResult<Vec<IndustryOverview>>;

    async fn industry(&self, slug: &str) -> AppResult<IndustryOverview>;

    async fn create_industry(&self, principal: &Principal, input: NewIndustry) -> AppResult<Industry>;

    async fn list_categories(&self, industry_id: Option<Uuid>) -> AppResult<Vec<Category>>;

    async fn create_category(&self, principal: &Principal, input: NewCategory) -> AppResult<Category>;

    async fn category_products(&self, category_id: Uuid, page: u64) -> AppResult<Paginated<Product>>;

    async fn list_products(&self, filter: ProductFilter, page: u64) -> AppResult<Paginated<Product>>;

    /// Detail of an active product; counts one view per call
    async fn product_detail(&self, product_id: Uuid) -> AppResult<ProductDetail>;

    async fn my_products(
        &self,
        principal: &Principal,
        search: Option<String>,
        page: u64,
    ) -> AppResult<Paginated<Product>>;

    async fn create_product(&self, principal: &Principal, input: ProductInput) -> AppResult<Product>;

    async fn update_product(
        &self,
        principal: &Principal,
        product_id: Uuid,
        input: ProductInput,
    ) -> AppResult<Product>;

    async fn delete_product(&self, principal: &Principal, product_id: Uuid) -> AppResult<()>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn overview_of(&self, industry: Industry) -> AppResult<IndustryOverview> {
        let catalog = self.uow.catalog();
        let categories = catalog.list_categories(Some(industry.id)).await?;
        let stats = catalog.industry_stats(industry.id).await?;
        Ok(IndustryOverview {
            industry,
            categories: category_trees(categories),
            stats,
        })
    }

    /// Active category or NotFound
    async fn active_category(&self, category_id: Uuid) -> AppResult<Category> {
        self.uow
            .catalog()
            .find_category(category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AppError::NotFound)
    }

    /// The caller's own product, or NotFound (other companies' products are invisible here)
    async fn owned_product(&self, principal: &Principal, product_id: Uuid) -> AppResult<Product> {
        self.uow
            .catalog()
            .find_product(product_id)
            .await?
            .filter(|p| p.company_id == principal.company_id)
            .ok_or(AppError::NotFound)
    }

    async fn product_record(
        &self,
        input: ProductInput,
        existing_images: Vec<String>,
    ) -> AppResult<ProductRecord> {
        let category = self.active_category(input.category_id).await?;
        let currency = normalize_currency(input.currency.as_deref())?;
        let price_minor = to_minor_units(input.price)?;
        let added = into_data_uris(input.images)?;

        Ok(ProductRecord {
            category_id: category.id,
            name: input.name.trim().to_string(),
            description: input.description,
            price_minor,
            currency,
            minimum_order_quantity: input.minimum_order_quantity,
            lead_time: input.lead_time,
            images: merge_images(existing_images, &input.remove_images, added),
            tags: input.tags,
            status: ProductStatus::for_submission(input.save_draft),
        })
    }
}

/// Top-level categories, each with its direct children
fn category_trees(categories: Vec<Category>) -> Vec<CategoryTree> {
    let (roots, children): (Vec<_>, Vec<_>) =
        categories.into_iter().partition(|c| c.parent_id.is_none());
    roots
        .into_iter()
        .map(|category| {
            let subcategories = children
                .iter()
                .filter(|c| c.parent_id == Some(category.id))
                .cloned()
                .collect();
            CategoryTree {
                category,
                subcategories,
            }
        })
        .collect()
}

pub(crate) fn normalize_currency(currency: Option<&str>) -> AppResult<String> {
    let code = currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_ascii_uppercase();
    if SUPPORTED_CURRENCIES.contains(&code.as_str()) {
        Ok(code)
    } else {
        Err(AppError::validation(format!("Unsupported currency: {}", code)))
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_industries(&self) -> AppResult<Vec<Industry>> {
        self.uow.catalog().list_industries().await
    }

    async fn industry_overview(&self) -> AppResult<Vec<IndustryOverview>> {
        let industries = self.uow.catalog().list_industries().await?;
        let mut overview = Vec::with_capacity(industries.len());
        for industry in industries {
            overview.push(self.overview_of(industry).await?);
        }
        Ok(overview)
    }

    async fn industry(&self, slug: &str) -> AppResult<IndustryOverview> {
        let industry = self
            .uow
            .catalog()
            .find_industry_by_slug(slug)
            .await?
            .filter(|i| i.is_active)
            .ok_or(AppError::NotFound)?;
        self.overview_of(industry).await
    }

    async fn create_industry(&self, principal: &Principal, input: NewIndustry) -> AppResult<Industry> {
        principal.require_staff()?;

        let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => slugify(slug),
            None => slugify(&input.name),
        };
        if slug.is_empty() {
            return Err(AppError::validation("Industry slug cannot be empty"));
        }

        let catalog = self.uow.catalog();
        if catalog.find_industry_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict("Industry slug"));
        }

        let image = input.image.map(|i| i.into_data_uri()).transpose()?;
        let industry = catalog
            .create_industry(NewIndustryRecord {
                name: input.name.trim().to_string(),
                slug,
                description: input.description,
                icon: input.icon,
                image: image.unwrap_or_default(),
                display_order: input.display_order,
            })
            .await?;

        tracing::info!(industry_id = %industry.id, slug = %industry.slug, "Industry created");
        Ok(industry)
    }

    async fn list_categories(&self, industry_id: Option<Uuid>) -> AppResult<Vec<Category>> {
        self.uow.catalog().list_categories(industry_id).await
    }

    async fn create_category(&self, principal: &Principal, input: NewCategory) -> AppResult<Category> {
        principal.require_staff()?;

        let catalog = self.uow.catalog();
        if catalog.find_industry(input.industry_id).await?.is_none() {
            return Err(AppError::validation("Industry does not exist"));
        }
        if let Some(parent_id) = input.parent_id {
            let parent = catalog
                .find_category(parent_id)
                .await?
                .ok_or_else(|| AppError::validation("Parent category does not exist"))?;
            if parent.industry_id != input.industry_id {
                return Err(AppError::validation(
                    "Parent category belongs to a different industry",
                ));
            }
            if parent.parent_id.is_some() {
                return Err(AppError::validation(
                    "Subcategories cannot be nested more than one level",
                ));
            }
        }

        catalog.create_category(input).await
    }

    async fn category_products(&self, category_id: Uuid, page: u64) -> AppResult<Paginated<Product>> {
        let category = self.active_category(category_id).await?;
        let params = PaginationParams::new(page, CATALOG_PAGE_SIZE);
        let (products, total) = self
            .uow
            .catalog()
            .category_products(category.id, params.clone())
            .await?;
        Ok(Paginated::new(products, &params, total))
    }

    async fn list_products(&self, filter: ProductFilter, page: u64) -> AppResult<Paginated<Product>> {
        let params = PaginationParams::new(page, CATALOG_PAGE_SIZE);
        let (products, total) = self
            .uow
            .catalog()
            .search_products(filter, params.clone())
            .await?;
        Ok(Paginated::new(products, &params, total))
    }

    async fn product_detail(&self, product_id: Uuid) -> AppResult<ProductDetail> {
        let catalog = self.uow.catalog();
        let mut product = catalog
            .find_product(product_id)
            .await?
            .filter(Product::is_active)
            .ok_or(AppError::NotFound)?;

        catalog.increment_views(product.id).await?;
        product.views_count += 1;

        let category = catalog
            .find_category(product.category_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let company = self
            .uow
            .accounts()
            .find_company(product.company_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let related_products = catalog
            .related_products(product.category_id, product.id, RELATED_PRODUCTS_LIMIT)
            .await?;
        let company_products = catalog
            .more_from_company(product.company_id, product.id, COMPANY_PRODUCTS_LIMIT)
            .await?;

        Ok(ProductDetail {
            product,
            category,
            supplier: SupplierSummary {
                id: company.id,
                company_name: company.company_name,
                is_verified: company.is_verified,
            },
            related_products,
            company_products,
        })
    }

    async fn my_products(
        &self,
        principal: &Principal,
        search: Option<String>,
        page: u64,
    ) -> AppResult<Paginated<Product>> {
        principal.require_active_vendor()?;
        let params = PaginationParams::new(page, MY_PRODUCTS_PAGE_SIZE);
        let (products, total) = self
            .uow
            .catalog()
            .company_products(principal.company_id, search, params.clone())
            .await?;
        Ok(Paginated::new(products, &params, total))
    }

    async fn create_product(&self, principal: &Principal, input: ProductInput) -> AppResult<Product> {
        principal.require_active_vendor()?;
        if input.images.len() > MAX_IMAGES_ON_CREATE {
            return Err(AppError::validation(format!(
                "At most {} images can be uploaded with a new product",
                MAX_IMAGES_ON_CREATE
            )));
        }

        let record = self.product_record(input, Vec::new()).await?;
        let product = self
            .uow
            .catalog()
            .create_product(principal.company_id, record)
            .await?;

        tracing::info!(
            product_id = %product.id,
            company_id = %principal.company_id,
            status = product.status.as_str(),
            "Product created"
        );
        Ok(product)
    }

    async fn update_product(
        &self,
        principal: &Principal,
        product_id: Uuid,
        input: ProductInput,
    ) -> AppResult<Product> {
        principal.require_active_vendor()?;
        let existing = self.owned_product(principal, product_id).await?;

        let record = self.product_record(input, existing.images).await?;
        self.uow.catalog().update_product(existing.id, record).await
    }

    async fn delete_product(&self, principal: &Principal, product_id: Uuid) -> AppResult<()> {
        principal.require_active_vendor()?;
        let existing = self.owned_product(principal, product_id).await?;

        self.uow.catalog().delete_product(existing.id).await?;
        tracing::info!(%product_id, company_id = %principal.company_id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::fixtures::principal;
    use crate::domain::{CompanyRole, ImageUpload, SubscriptionStatus};
    use crate::infra::MockCatalogRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn category(id: Uuid, industry_id: Uuid, parent_id: Option<Uuid>) -> Category {
        Category {
            id,
            name: format!("cat-{}", id),
            industry_id,
            parent_id,
            description: String::new(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn product(company_id: Uuid, status: ProductStatus) -> Product {
        Product {
            id: Uuid::new_v4(),
            company_id,
            category_id: Uuid::new_v4(),
            name: "Steel pipe".into(),
            description: "Seamless".into(),
            price: Decimal::new(10000, 2),
            currency: "USD".into(),
            minimum_order_quantity: String::new(),
            lead_time: String::new(),
            images: vec!["data:image/png;base64,AA==".into()],
            tags: "steel, pipe".into(),
            status,
            featured: false,
            views_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn input(category_id: Uuid) -> ProductInput {
        ProductInput {
            name: "Steel pipe".into(),
            category_id,
            description: "Seamless".into(),
            price: Decimal::new(10000, 2),
            currency: None,
            minimum_order_quantity: "10".into(),
            lead_time: "2 weeks".into(),
            tags: "steel".into(),
            images: vec![],
            remove_images: vec![],
            save_draft: false,
        }
    }

    fn service(catalog: MockCatalogRepository) -> CatalogManager<TestUnitOfWork> {
        CatalogManager::new(Arc::new(TestUnitOfWork::default().with_catalog(catalog)))
    }

    #[test]
    fn test_category_trees_nest_children_under_roots() {
        let industry = Uuid::new_v4();
        let root = Uuid::new_v4();
        let other_root = Uuid::new_v4();
        let trees = category_trees(vec![
            category(root, industry, None),
            category(Uuid::new_v4(), industry, Some(root)),
            category(other_root, industry, None),
            category(Uuid::new_v4(), industry, Some(root)),
        ]);

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].category.id, root);
        assert_eq!(trees[0].subcategories.len(), 2);
        assert!(trees[1].subcategories.is_empty());
    }

    #[test]
    fn test_currency_defaults_and_validates() {
        assert_eq!(normalize_currency(None).unwrap(), "USD");
        assert_eq!(normalize_currency(Some(" eur ")).unwrap(), "EUR");
        assert!(normalize_currency(Some("XYZ")).is_err());
    }

    #[tokio::test]
    async fn test_buyer_cannot_create_products() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let result = service(MockCatalogRepository::new())
            .create_product(&buyer, input(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_pending_vendor_is_sent_to_pricing() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Pending);
        let err = service(MockCatalogRepository::new())
            .my_products(&vendor, None, 1)
            .await
            .unwrap_err();
        assert_eq!(err.redirect_to().as_deref(), Some("/pricing"));
    }

    #[tokio::test]
    async fn test_create_limits_initial_images() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let mut too_many = input(Uuid::new_v4());
        too_many.images = (0..4).map(|_| ImageUpload::new("image/png", b"x")).collect();

        let result = service(MockCatalogRepository::new())
            .create_product(&vendor, too_many)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_draft_submission_is_stored_as_draft() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let company_id = vendor.company_id;
        let category_id = Uuid::new_v4();

        let mut repo = MockCatalogRepository::new();
        repo.expect_find_category()
            .returning(move |id| Ok(Some(category(id, Uuid::new_v4(), None))));
        repo.expect_create_product()
            .withf(move |owner, record| {
                *owner == company_id
                    && record.status == ProductStatus::Draft
                    && record.price_minor == 10000
                    && record.currency == "USD"
            })
            .times(1)
            .returning(|owner, _| Ok(product(owner, ProductStatus::Draft)));

        let mut draft = input(category_id);
        draft.save_draft = true;
        let created = service(repo).create_product(&vendor, draft).await.unwrap();
        assert_eq!(created.status, ProductStatus::Draft);
    }

    #[tokio::test]
    async fn test_cannot_edit_another_companys_product() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let foreign = product(Uuid::new_v4(), ProductStatus::Active);
        let foreign_id = foreign.id;

        let mut repo = MockCatalogRepository::new();
        repo.expect_find_product()
            .returning(move |_| Ok(Some(foreign.clone())));
        repo.expect_update_product().never();
        repo.expect_delete_product().never();

        let service = service(repo);
        assert!(matches!(
            service
                .update_product(&vendor, foreign_id, input(Uuid::new_v4()))
                .await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            service.delete_product(&vendor, foreign_id).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_edit_keeps_remaining_images() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let mut own = product(vendor.company_id, ProductStatus::Active);
        own.images = vec!["data:a".into(), "data:b".into()];
        let own_id = own.id;

        let mut repo = MockCatalogRepository::new();
        repo.expect_find_product()
            .returning(move |_| Ok(Some(own.clone())));
        repo.expect_find_category()
            .returning(move |id| Ok(Some(category(id, Uuid::new_v4(), None))));
        repo.expect_update_product()
            .withf(|_, record| record.images.len() == 2 && record.images[0] == "data:b")
            .times(1)
            .returning(move |_, _| Err(AppError::NotFound));

        let mut edit = input(Uuid::new_v4());
        edit.remove_images = vec!["data:a".into()];
        edit.images = vec![ImageUpload::new("image/png", b"png")];
        let _ = service(repo).update_product(&vendor, own_id, edit).await;
    }

    #[tokio::test]
    async fn test_inactive_product_detail_is_not_found_and_not_counted() {
        let draft = product(Uuid::new_v4(), ProductStatus::Draft);
        let id = draft.id;

        let mut repo = MockCatalogRepository::new();
        repo.expect_find_product()
            .returning(move |_| Ok(Some(draft.clone())));
        repo.expect_increment_views().never();

        assert!(matches!(
            service(repo).product_detail(id).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_nested_subcategory_is_rejected() {
        let mut staff = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        staff.is_staff = true;
        let industry = Uuid::new_v4();
        let parent = category(Uuid::new_v4(), industry, Some(Uuid::new_v4()));
        let parent_id = parent.id;

        let mut repo = MockCatalogRepository::new();
        repo.expect_find_industry().returning(move |id| {
            Ok(Some(Industry {
                id,
                name: "Metals".into(),
                slug: "metals".into(),
                description: String::new(),
                icon: String::new(),
                image: String::new(),
                is_active: true,
                display_order: 0,
                created_at: Utc::now(),
            }))
        });
        repo.expect_find_category()
            .returning(move |_| Ok(Some(parent.clone())));
        repo.expect_create_category().never();

        let result = service(repo)
            .create_category(
                &staff,
                NewCategory {
                    name: "Tubes".into(),
                    industry_id: industry,
                    parent_id: Some(parent_id),
                    description: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
