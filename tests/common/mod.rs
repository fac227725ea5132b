//! Shared setup: real services over a migrated in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use b2b_marketplace::config::Config;
use b2b_marketplace::domain::{
    Category, CompanyRole, Industry, NewCategory, NewIndustry, NewQuoteRequest, Principal,
    Product, ProductInput, RegisterAccount, SubscriptionStatus,
};
use b2b_marketplace::infra::{Database, LogMailer, Persistence};
use b2b_marketplace::services::{
    AccountManager, AccountService, AuthService, Authenticator, CatalogManager, CatalogService,
    ContentManager, DashboardManager, MessagingManager, NotificationManager, QuoteManager,
};

pub const PASSWORD: &str = "SecurePass123!";
const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

pub struct TestApp {
    pub uow: Arc<Persistence>,
    pub auth: Authenticator<Persistence>,
    pub accounts: AccountManager<Persistence>,
    pub catalog: CatalogManager<Persistence>,
    pub quotes: QuoteManager<Persistence>,
    pub messaging: MessagingManager<Persistence>,
    pub notifications: NotificationManager<Persistence>,
    pub dashboards: DashboardManager<Persistence>,
    pub content: ContentManager<Persistence>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::connect_url("sqlite::memory:")
            .await
            .expect("sqlite connects");
        db.run_migrations().await.expect("migrations apply");

        let uow = Arc::new(Persistence::new(db.get_connection()));
        let config = Config::new("sqlite::memory:", JWT_SECRET);

        Self {
            uow: uow.clone(),
            auth: Authenticator::new(uow.clone(), config),
            accounts: AccountManager::new(uow.clone()),
            catalog: CatalogManager::new(uow.clone()),
            quotes: QuoteManager::new(
                uow.clone(),
                Arc::new(LogMailer::new("noreply@test.local")),
                "http://localhost:3000/dashboard",
            ),
            messaging: MessagingManager::new(uow.clone()),
            notifications: NotificationManager::new(uow.clone()),
            dashboards: DashboardManager::new(uow.clone()),
            content: ContentManager::new(uow),
        }
    }

    pub fn registration(email: &str, role: CompanyRole, company_name: &str) -> RegisterAccount {
        RegisterAccount {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            password_confirm: PASSWORD.to_string(),
            role,
            company_name: company_name.to_string(),
            industries: vec![],
            other_industry: String::new(),
            terms_accepted: true,
        }
    }

    /// Register and load the resulting principal
    pub async fn register(&self, email: &str, role: CompanyRole, company_name: &str) -> Principal {
        let registration = self
            .auth
            .register(Self::registration(email, role, company_name))
            .await
            .expect("registration succeeds");
        self.auth
            .principal(registration.account.user_id)
            .await
            .expect("principal loads")
    }

    /// Staff principal piggybacking on an existing account
    pub fn staff(of: &Principal) -> Principal {
        Principal {
            is_staff: true,
            ..of.clone()
        }
    }

    /// Vendor whose subscription has been activated by staff
    pub async fn active_vendor(&self, email: &str, company_name: &str) -> Principal {
        let vendor = self.register(email, CompanyRole::Vendor, company_name).await;
        self.accounts
            .set_subscription(&Self::staff(&vendor), vendor.company_id, SubscriptionStatus::Active)
            .await
            .expect("subscription activates");
        self.auth
            .principal(vendor.user_id)
            .await
            .expect("principal reloads")
    }

    pub async fn seed_category(&self, staff: &Principal) -> (Industry, Category) {
        self.seed_category_in(staff, "Metal", "Steel").await
    }

    pub async fn seed_category_in(
        &self,
        staff: &Principal,
        industry_name: &str,
        category_name: &str,
    ) -> (Industry, Category) {
        let industry = self
            .catalog
            .create_industry(
                staff,
                NewIndustry {
                    name: industry_name.to_string(),
                    slug: None,
                    description: String::new(),
                    icon: String::new(),
                    image: None,
                    display_order: 0,
                },
            )
            .await
            .expect("industry created");
        let category = self
            .catalog
            .create_category(
                staff,
                NewCategory {
                    name: category_name.to_string(),
                    industry_id: industry.id,
                    parent_id: None,
                    description: String::new(),
                },
            )
            .await
            .expect("category created");
        (industry, category)
    }

    pub async fn product(
        &self,
        vendor: &Principal,
        category_id: Uuid,
        name: &str,
        price: Decimal,
        save_draft: bool,
    ) -> Product {
        self.catalog
            .create_product(
                vendor,
                ProductInput {
                    name: name.to_string(),
                    category_id,
                    description: format!("{} for industrial use", name),
                    price,
                    currency: None,
                    minimum_order_quantity: "10 units".to_string(),
                    lead_time: "2 weeks".to_string(),
                    tags: "steel, bulk".to_string(),
                    images: vec![],
                    remove_images: vec![],
                    save_draft,
                },
            )
            .await
            .expect("product created")
    }
}

pub fn quote_form(message: &str) -> NewQuoteRequest {
    NewQuoteRequest {
        message: message.to_string(),
        quantity: "50 units".to_string(),
        target_price: Some(Decimal::new(9500, 2)),
        delivery_location: "Dubai".to_string(),
        expected_delivery: "Next month".to_string(),
        contact_name: "Jo Buyer".to_string(),
        contact_email: "jo@buyer.test".to_string(),
        contact_phone: String::new(),
    }
}
