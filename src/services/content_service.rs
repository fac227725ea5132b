//! Public marketing content and its staff-only administration.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::catalog_service::normalize_currency;
use super::container::parallel;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::content::{DEFAULT_HERO_SUBTITLE, DEFAULT_HERO_TITLE};
use crate::domain::{
    ContactInquiry, HeroImage, HomePage, NewContactInquiry, NewHeroImage, NewTestimonial,
    PricingPage, Principal, SiteSettings, Testimonial, UpdateSiteSettings,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::HeroImageRecord;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ContentService: Send + Sync {
    async fn home(&self) -> AppResult<HomePage>;

    async fn pricing(&self) -> AppResult<PricingPage>;

    /// First stored row, or defaults when none exists
    async fn site_settings(&self) -> AppResult<SiteSettings>;

    async fn submit_inquiry(&self, input: NewContactInquiry) -> AppResult<ContactInquiry>;

    async fn create_hero_image(&self, principal: &Principal, input: NewHeroImage) -> AppResult<HeroImage>;

    async fn create_testimonial(&self, principal: &Principal, input: NewTestimonial) -> AppResult<Testimonial>;

    /// Merge the given fields onto the current settings and store them
    async fn update_site_settings(
        &self,
        principal: &Principal,
        input: UpdateSiteSettings,
    ) -> AppResult<SiteSettings>;

    async fn list_inquiries(&self, principal: &Principal, page: u64) -> AppResult<Paginated<ContactInquiry>>;

    async fn mark_inquiry_responded(&self, principal: &Principal, id: Uuid) -> AppResult<ContactInquiry>;
}

pub struct ContentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ContentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Blank hero text falls back to the stock headline.
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn merge_settings(mut current: SiteSettings, input: UpdateSiteSettings) -> AppResult<SiteSettings> {
    if let Some(site_name) = input.site_name {
        current.site_name = site_name;
    }
    if let Some(annual_fee) = input.annual_fee {
        if annual_fee.is_sign_negative() {
            return Err(AppError::validation("Annual fee cannot be negative"));
        }
        current.annual_fee = annual_fee;
    }
    if let Some(currency) = input.currency {
        current.currency = normalize_currency(Some(&currency))?;
    }
    if let Some(contact_email) = input.contact_email {
        current.contact_email = contact_email;
    }
    if let Some(contact_phone) = input.contact_phone {
        current.contact_phone = contact_phone;
    }
    if let Some(address) = input.address {
        current.address = address;
    }
    if let Some(logo) = input.site_logo {
        current.site_logo = logo.into_data_uri()?;
    }
    Ok(current)
}

#[async_trait]
impl<U: UnitOfWork> ContentService for ContentManager<U> {
    async fn home(&self) -> AppResult<HomePage> {
        let catalog = self.uow.catalog();
        let content = self.uow.content();
        let (industries, hero_images, testimonials) = parallel::join3(
            catalog.list_industries(),
            content.active_hero_images(),
            content.active_testimonials(),
        )
        .await?;

        Ok(HomePage {
            industries,
            hero_images,
            testimonials,
            site_settings: self.site_settings().await?,
        })
    }

    async fn pricing(&self) -> AppResult<PricingPage> {
        Ok(PricingPage::from(self.site_settings().await?))
    }

    async fn site_settings(&self) -> AppResult<SiteSettings> {
        Ok(self.uow.content().site_settings().await?.unwrap_or_default())
    }

    async fn submit_inquiry(&self, input: NewContactInquiry) -> AppResult<ContactInquiry> {
        let inquiry = self.uow.content().create_inquiry(input).await?;
        tracing::info!(inquiry_id = %inquiry.id, "Contact inquiry received");
        Ok(inquiry)
    }

    async fn create_hero_image(&self, principal: &Principal, input: NewHeroImage) -> AppResult<HeroImage> {
        principal.require_staff()?;
        let record = HeroImageRecord {
            title: input.title,
            hero_title: or_default(input.hero_title, DEFAULT_HERO_TITLE),
            hero_subtitle: or_default(input.hero_subtitle, DEFAULT_HERO_SUBTITLE),
            image: input.image.into_data_uri()?,
            display_order: input.display_order,
            is_active: input.is_active,
        };
        self.uow.content().create_hero_image(record).await
    }

    async fn create_testimonial(&self, principal: &Principal, input: NewTestimonial) -> AppResult<Testimonial> {
        principal.require_staff()?;
        self.uow.content().create_testimonial(input).await
    }

    async fn update_site_settings(
        &self,
        principal: &Principal,
        input: UpdateSiteSettings,
    ) -> AppResult<SiteSettings> {
        principal.require_staff()?;
        let current = self.site_settings().await?;
        let settings = merge_settings(current, input)?;
        let saved = self.uow.content().save_site_settings(settings).await?;
        tracing::info!(by = %principal.user_id, "Site settings updated");
        Ok(saved)
    }

    async fn list_inquiries(&self, principal: &Principal, page: u64) -> AppResult<Paginated<ContactInquiry>> {
        principal.require_staff()?;
        let params = PaginationParams::new(page, DEFAULT_PAGE_SIZE);
        let (items, total) = self.uow.content().list_inquiries(params.clone()).await?;
        Ok(Paginated::new(items, &params, total))
    }

    async fn mark_inquiry_responded(&self, principal: &Principal, id: Uuid) -> AppResult<ContactInquiry> {
        principal.require_staff()?;
        self.uow.content().mark_inquiry_responded(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::fixtures::principal;
    use crate::domain::{CompanyRole, ImageUpload, SubscriptionStatus};
    use crate::infra::{MockCatalogRepository, MockContentRepository};
    use crate::services::test_support::TestUnitOfWork;
    use rust_decimal::Decimal;

    fn staff() -> Principal {
        let mut p = principal(CompanyRole::ConsumerBuyer, SubscriptionStatus::Active);
        p.is_staff = true;
        p
    }

    #[tokio::test]
    async fn test_settings_default_when_missing() {
        let mut content = MockContentRepository::new();
        content.expect_site_settings().returning(|| Ok(None));

        let service = ContentManager::new(Arc::new(TestUnitOfWork::default().with_content(content)));
        let pricing = service.pricing().await.unwrap();
        assert_eq!(pricing.currency, "USD");
        assert_eq!(pricing.annual_fee, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_home_collects_sections() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_list_industries().returning(|| Ok(vec![]));
        let mut content = MockContentRepository::new();
        content.expect_active_hero_images().returning(|| Ok(vec![]));
        content.expect_active_testimonials().returning(|| Ok(vec![]));
        content.expect_site_settings().returning(|| Ok(None));

        let uow = TestUnitOfWork::default()
            .with_catalog(catalog)
            .with_content(content);
        let home = ContentManager::new(Arc::new(uow)).home().await.unwrap();
        assert!(home.industries.is_empty());
        assert_eq!(home.site_settings, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_admin_operations_require_staff() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        let service = ContentManager::new(Arc::new(TestUnitOfWork::default()));

        let result = service
            .update_site_settings(&vendor, UpdateSiteSettings::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        let result = service.list_inquiries(&vendor, 1).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_hero_image_defaults_headline() {
        let mut content = MockContentRepository::new();
        content
            .expect_create_hero_image()
            .withf(|r| r.hero_title == DEFAULT_HERO_TITLE && r.image.starts_with("data:image/png;base64,"))
            .returning(|r| {
                Ok(HeroImage {
                    id: Uuid::new_v4(),
                    title: r.title,
                    hero_title: r.hero_title,
                    hero_subtitle: r.hero_subtitle,
                    image: r.image,
                    is_active: r.is_active,
                    display_order: r.display_order,
                    created_at: chrono::Utc::now(),
                })
            });

        let service = ContentManager::new(Arc::new(TestUnitOfWork::default().with_content(content)));
        let hero = service
            .create_hero_image(
                &staff(),
                NewHeroImage {
                    title: "Banner".into(),
                    hero_title: Some("  ".into()),
                    hero_subtitle: None,
                    image: ImageUpload::new("image/png", b"png-bytes"),
                    display_order: 1,
                    is_active: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(hero.hero_subtitle, DEFAULT_HERO_SUBTITLE);
    }

    #[test]
    fn test_merge_settings_keeps_absent_fields() {
        let current = SiteSettings {
            contact_phone: "+971 4 000 0000".into(),
            ..SiteSettings::default()
        };
        let merged = merge_settings(
            current,
            UpdateSiteSettings {
                annual_fee: Some(Decimal::new(49900, 2)),
                currency: Some("eur".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(merged.annual_fee, Decimal::new(49900, 2));
        assert_eq!(merged.currency, "EUR");
        assert_eq!(merged.contact_phone, "+971 4 000 0000");
    }

    #[test]
    fn test_merge_settings_rejects_negative_fee() {
        let result = merge_settings(
            SiteSettings::default(),
            UpdateSiteSettings {
                annual_fee: Some(Decimal::new(-1, 0)),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
