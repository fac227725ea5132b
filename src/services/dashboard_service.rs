//! Dashboard service - role-branched, point-in-time snapshots.
//!
//! Independent counts are fetched concurrently; nothing is cached.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;

use super::container::parallel;
use crate::config::{ACTIVITY_FEED_LIMIT, RECENT_ACTIVITY_DAYS, RECENT_PRODUCTS_LIMIT};
use crate::domain::dashboard::{growth_rate, newest_first, percentage};
use crate::domain::{
    ActivityItem, AdminDashboard, BuyerDashboard, CompanyRole, Dashboard, IndustryShare,
    Principal, ProductStatus, VendorDashboard,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Vendor or buyer dashboard, depending on the caller's role
    async fn dashboard(&self, principal: &Principal) -> AppResult<Dashboard>;

    /// Platform metrics; staff only
    async fn admin_dashboard(&self, principal: &Principal) -> AppResult<AdminDashboard>;
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn vendor(&self, principal: &Principal) -> AppResult<VendorDashboard> {
        let catalog = self.uow.catalog();
        let company_id = Some(principal.company_id);
        let since = Utc::now() - Duration::days(RECENT_ACTIVITY_DAYS);

        let (total_products, active_products, draft_products, total_views) = parallel::join4(
            catalog.count_products(company_id, None),
            catalog.count_products(company_id, Some(ProductStatus::Active)),
            catalog.count_products(company_id, Some(ProductStatus::Draft)),
            catalog.company_total_views(principal.company_id),
        )
        .await?;

        let (recent_products, recently_added, company) = parallel::join3(
            catalog.recent_products(company_id, None, None, RECENT_PRODUCTS_LIMIT),
            catalog.recent_products(company_id, None, Some(since), ACTIVITY_FEED_LIMIT as u64),
            self.uow.accounts().find_company(principal.company_id),
        )
        .await?;
        let company = company.ok_or(AppError::NotFound)?;

        let recent_activity = newest_first(
            recently_added
                .into_iter()
                .map(|p| {
                    ActivityItem::new("product_added", format!("Added product: {}", p.name), p.created_at)
                        .with_details(p.status.as_str().to_string())
                })
                .collect(),
        );

        Ok(VendorDashboard {
            total_products,
            active_products,
            draft_products,
            total_views,
            recent_products,
            recent_activity,
            subscription_status: company.subscription_status,
            subscription_expiry: company.subscription_end_date,
        })
    }

    async fn buyer(&self) -> AppResult<BuyerDashboard> {
        let catalog = self.uow.catalog();
        let active = Some(ProductStatus::Active);

        let (total_marketplace_products, available_industries, recent_marketplace_products, feed) =
            parallel::join4(
                catalog.count_products(None, active),
                catalog.count_active_industries(),
                catalog.recent_products(None, active, None, RECENT_PRODUCTS_LIMIT),
                catalog.recent_products(None, active, None, ACTIVITY_FEED_LIMIT as u64),
            )
            .await?;

        let companies = self
            .uow
            .accounts()
            .company_names(feed.iter().map(|p| p.company_id).collect())
            .await?;
        let recent_activity = newest_first(
            feed.into_iter()
                .map(|p| {
                    let by = companies.get(&p.company_id).cloned().unwrap_or_default();
                    ActivityItem::new(
                        "new_product",
                        format!("New product {} available", p.name),
                        p.created_at,
                    )
                    .with_details(format!("By {}", by))
                })
                .collect(),
        );

        Ok(BuyerDashboard {
            total_marketplace_products,
            available_industries,
            recent_marketplace_products,
            recent_activity,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn dashboard(&self, principal: &Principal) -> AppResult<Dashboard> {
        Ok(match principal.role {
            CompanyRole::Vendor => Dashboard::Vendor(self.vendor(principal).await?),
            CompanyRole::BusinessBuyer => Dashboard::BusinessBuyer(self.buyer().await?),
            CompanyRole::ConsumerBuyer => Dashboard::ConsumerBuyer(self.buyer().await?),
        })
    }

    async fn admin_dashboard(&self, principal: &Principal) -> AppResult<AdminDashboard> {
        principal.require_staff()?;

        let accounts = self.uow.accounts();
        let catalog = self.uow.catalog();
        let since = Utc::now() - Duration::days(RECENT_ACTIVITY_DAYS);

        let (total_users, total_companies, total_products, active_subscriptions) =
            parallel::join4(
                accounts.count_users(),
                accounts.count_companies(),
                catalog.count_products(None, None),
                accounts.count_active_subscriptions(),
            )
            .await?;
        let (new_users_30d, new_products_30d) = parallel::join2(
            accounts.count_users_since(since),
            catalog.count_products_since(since),
        )
        .await?;

        let industries = catalog.list_industries().await?;
        let counts = parallel::join_all(
            industries
                .iter()
                .map(|i| catalog.count_industry_products(i.id))
                .collect(),
        )
        .await?;
        let industry_stats = industries
            .into_iter()
            .zip(counts)
            .map(|(industry, count)| IndustryShare {
                name: industry.name,
                count,
                percentage: percentage(count, total_products),
            })
            .collect();

        let (companies, products) = parallel::join2(
            accounts.recent_companies(RECENT_PRODUCTS_LIMIT),
            catalog.recent_products(None, None, None, RECENT_PRODUCTS_LIMIT),
        )
        .await?;
        let mut activity: Vec<ActivityItem> = companies
            .into_iter()
            .map(|c| {
                ActivityItem::new(
                    "new_registration",
                    format!("New registration: {}", c.company_name),
                    c.created_at,
                )
                .with_details(c.role.to_string())
            })
            .collect();
        activity.extend(products.into_iter().map(|p| {
            ActivityItem::new("new_product", format!("New product: {}", p.name), p.created_at)
                .with_details(p.status.as_str().to_string())
        }));

        Ok(AdminDashboard {
            total_users,
            total_companies,
            total_products,
            active_subscriptions,
            new_users_30d,
            new_products_30d,
            user_growth_rate: growth_rate(new_users_30d, total_users),
            product_growth_rate: growth_rate(new_products_30d, total_products),
            industry_stats,
            recent_activity: newest_first(activity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::fixtures::principal;
    use crate::domain::SubscriptionStatus;
    use crate::infra::{MockAccountRepository, MockCatalogRepository};
    use crate::services::test_support::TestUnitOfWork;

    #[tokio::test]
    async fn test_admin_dashboard_requires_staff() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let result = DashboardManager::new(Arc::new(TestUnitOfWork::default()))
            .admin_dashboard(&vendor)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_empty_platform_reports_zero_growth() {
        let mut staff = principal(CompanyRole::ConsumerBuyer, SubscriptionStatus::Active);
        staff.is_staff = true;

        let mut accounts = MockAccountRepository::new();
        accounts.expect_count_users().returning(|| Ok(0));
        accounts.expect_count_companies().returning(|| Ok(0));
        accounts.expect_count_active_subscriptions().returning(|| Ok(0));
        accounts.expect_count_users_since().returning(|_| Ok(0));
        accounts.expect_recent_companies().returning(|_| Ok(vec![]));
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_count_products().returning(|_, _| Ok(0));
        catalog.expect_count_products_since().returning(|_| Ok(0));
        catalog.expect_list_industries().returning(|| Ok(vec![]));
        catalog
            .expect_recent_products()
            .returning(|_, _, _, _| Ok(vec![]));

        let uow = TestUnitOfWork::default()
            .with_accounts(accounts)
            .with_catalog(catalog);
        let dashboard = DashboardManager::new(Arc::new(uow))
            .admin_dashboard(&staff)
            .await
            .unwrap();

        assert_eq!(dashboard.total_products, 0);
        assert_eq!(dashboard.product_growth_rate, 0.0);
        assert_eq!(dashboard.user_growth_rate, 0.0);
        assert!(dashboard.industry_stats.is_empty());
        assert!(dashboard.recent_activity.is_empty());
    }

    #[tokio::test]
    async fn test_buyer_roles_get_buyer_dashboard() {
        let buyer = principal(CompanyRole::ConsumerBuyer, SubscriptionStatus::Active);

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_count_products()
            .withf(|company, status| company.is_none() && *status == Some(ProductStatus::Active))
            .returning(|_, _| Ok(7));
        catalog.expect_count_active_industries().returning(|| Ok(3));
        catalog
            .expect_recent_products()
            .returning(|_, _, _, _| Ok(vec![]));
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_company_names()
            .returning(|_| Ok(Default::default()));

        let uow = TestUnitOfWork::default()
            .with_catalog(catalog)
            .with_accounts(accounts);
        let dashboard = DashboardManager::new(Arc::new(uow))
            .dashboard(&buyer)
            .await
            .unwrap();

        match dashboard {
            Dashboard::ConsumerBuyer(d) => {
                assert_eq!(d.total_marketplace_products, 7);
                assert_eq!(d.available_industries, 3);
            }
            other => panic!("unexpected dashboard: {:?}", other),
        }
    }
}
