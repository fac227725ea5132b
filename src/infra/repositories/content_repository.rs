//! Marketing site content.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::base;
use super::entities::{
    contact_inquiry::{self, Entity as InquiryEntity},
    hero_image::{self, Entity as HeroImageEntity},
    site_settings::{self, Entity as SiteSettingsEntity},
    testimonial::{self, Entity as TestimonialEntity},
};
use crate::domain::media::to_minor_units;
use crate::domain::{
    ContactInquiry, HeroImage, NewContactInquiry, NewTestimonial, SiteSettings, Testimonial,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Carousel slide to insert; `image` is already a data URI
#[derive(Debug, Clone)]
pub struct HeroImageRecord {
    pub title: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub image: String,
    pub display_order: i32,
    pub is_active: bool,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Active slides by display order
    async fn active_hero_images(&self) -> AppResult<Vec<HeroImage>>;

    async fn create_hero_image(&self, record: HeroImageRecord) -> AppResult<HeroImage>;

    /// Active testimonials by display order
    async fn active_testimonials(&self) -> AppResult<Vec<Testimonial>>;

    async fn create_testimonial(&self, input: NewTestimonial) -> AppResult<Testimonial>;

    /// The stored settings row, if any
    async fn site_settings(&self) -> AppResult<Option<SiteSettings>>;

    /// Overwrite the first settings row, creating it when missing
    async fn save_site_settings(&self, settings: SiteSettings) -> AppResult<SiteSettings>;

    async fn create_inquiry(&self, input: NewContactInquiry) -> AppResult<ContactInquiry>;

    /// Newest first
    async fn list_inquiries(&self, params: PaginationParams) -> AppResult<(Vec<ContactInquiry>, u64)>;

    async fn mark_inquiry_responded(&self, id: Uuid) -> AppResult<ContactInquiry>;
}

/// Concrete implementation of ContentRepository
pub struct ContentStore {
    db: DatabaseConnection,
}

impl ContentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn first_settings_row(&self) -> AppResult<Option<site_settings::Model>> {
        Ok(SiteSettingsEntity::find()
            .order_by_asc(site_settings::Column::UpdatedAt)
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl ContentRepository for ContentStore {
    async fn active_hero_images(&self) -> AppResult<Vec<HeroImage>> {
        let models = HeroImageEntity::find()
            .filter(hero_image::Column::IsActive.eq(true))
            .order_by_asc(hero_image::Column::DisplayOrder)
            .order_by_desc(hero_image::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(HeroImage::from).collect())
    }

    async fn create_hero_image(&self, record: HeroImageRecord) -> AppResult<HeroImage> {
        let model = hero_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(record.title),
            hero_title: Set(record.hero_title),
            hero_subtitle: Set(record.hero_subtitle),
            image: Set(record.image),
            is_active: Set(record.is_active),
            display_order: Set(record.display_order),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(HeroImage::from(model))
    }

    async fn active_testimonials(&self) -> AppResult<Vec<Testimonial>> {
        let models = TestimonialEntity::find()
            .filter(testimonial::Column::IsActive.eq(true))
            .order_by_asc(testimonial::Column::DisplayOrder)
            .order_by_desc(testimonial::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Testimonial::from).collect())
    }

    async fn create_testimonial(&self, input: NewTestimonial) -> AppResult<Testimonial> {
        let model = testimonial::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_name: Set(input.client_name),
            client_title: Set(input.client_title),
            company_name: Set(input.company_name),
            testimonial_text: Set(input.testimonial_text),
            rating: Set(input.rating),
            is_active: Set(input.is_active),
            display_order: Set(input.display_order),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(Testimonial::from(model))
    }

    async fn site_settings(&self) -> AppResult<Option<SiteSettings>> {
        Ok(self.first_settings_row().await?.map(SiteSettings::from))
    }

    async fn save_site_settings(&self, settings: SiteSettings) -> AppResult<SiteSettings> {
        let annual_fee_minor = to_minor_units(settings.annual_fee)?;
        let now = Utc::now();

        let model = match self.first_settings_row().await? {
            Some(existing) => {
                let mut active: site_settings::ActiveModel = existing.into();
                active.site_name = Set(settings.site_name);
                active.annual_fee_minor = Set(annual_fee_minor);
                active.currency = Set(settings.currency);
                active.contact_email = Set(settings.contact_email);
                active.contact_phone = Set(settings.contact_phone);
                active.address = Set(settings.address);
                active.site_logo = Set(settings.site_logo);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                site_settings::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    site_name: Set(settings.site_name),
                    annual_fee_minor: Set(annual_fee_minor),
                    currency: Set(settings.currency),
                    contact_email: Set(settings.contact_email),
                    contact_phone: Set(settings.contact_phone),
                    address: Set(settings.address),
                    site_logo: Set(settings.site_logo),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await?
            }
        };
        Ok(SiteSettings::from(model))
    }

    async fn create_inquiry(&self, input: NewContactInquiry) -> AppResult<ContactInquiry> {
        let model = contact_inquiry::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            subject: Set(input.subject),
            message: Set(input.message),
            is_responded: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(ContactInquiry::from(model))
    }

    async fn list_inquiries(&self, params: PaginationParams) -> AppResult<(Vec<ContactInquiry>, u64)> {
        let query = InquiryEntity::find().order_by_desc(contact_inquiry::Column::CreatedAt);
        let (models, total) = base::fetch_page(&self.db, query, &params).await?;
        Ok((models.into_iter().map(ContactInquiry::from).collect(), total))
    }

    async fn mark_inquiry_responded(&self, id: Uuid) -> AppResult<ContactInquiry> {
        let model = InquiryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: contact_inquiry::ActiveModel = model.into();
        active.is_responded = Set(true);
        let model = active.update(&self.db).await?;
        Ok(ContactInquiry::from(model))
    }
}
