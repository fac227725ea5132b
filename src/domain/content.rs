//! Marketing site content.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::catalog::Industry;
use super::media::ImageUpload;
use crate::config::DEFAULT_CURRENCY;

pub const DEFAULT_HERO_TITLE: &str = "Connect in Metal, Wood, Plastic, Machineries, Technology";
pub const DEFAULT_HERO_SUBTITLE: &str = "Streamline your B2B trading with our multi-vendor platform. Find verified suppliers, secure payments, and industry-focused solutions.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeroImage {
    pub id: Uuid,
    pub title: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub image: String,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewHeroImage {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 300))]
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub image: ImageUpload,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Testimonial {
    pub id: Uuid,
    pub client_name: String,
    pub client_title: String,
    pub company_name: String,
    pub testimonial_text: String,
    pub rating: i32,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewTestimonial {
    #[validate(length(min = 1, max = 200, message = "Client name is required"))]
    pub client_name: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub client_title: String,
    #[validate(length(min = 1, max = 200, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Testimonial text is required"))]
    pub testimonial_text: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn default_rating() -> i32 {
    5
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SiteSettings {
    pub site_name: String,
    #[schema(value_type = String, example = "0.00")]
    pub annual_fee: Decimal,
    pub currency: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub site_logo: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "MWPUAE Platform".to_string(),
            annual_fee: Decimal::ZERO,
            currency: DEFAULT_CURRENCY.to_string(),
            contact_email: "info@mwpuaeplatform.com".to_string(),
            contact_phone: String::new(),
            address: String::new(),
            site_logo: String::new(),
        }
    }
}

/// Settings upsert; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSiteSettings {
    #[validate(length(min = 1, max = 100))]
    pub site_name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub annual_fee: Option<Decimal>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 20))]
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub site_logo: Option<ImageUpload>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactInquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_responded: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewContactInquiry {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HomePage {
    pub industries: Vec<Industry>,
    pub hero_images: Vec<HeroImage>,
    pub testimonials: Vec<Testimonial>,
    pub site_settings: SiteSettings,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PricingPage {
    #[schema(value_type = String)]
    pub annual_fee: Decimal,
    pub currency: String,
    pub site_settings: SiteSettings,
}

impl From<SiteSettings> for PricingPage {
    fn from(settings: SiteSettings) -> Self {
        Self {
            annual_fee: settings.annual_fee,
            currency: settings.currency.clone(),
            site_settings: settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testimonial_rating_bounds() {
        let mut t = NewTestimonial {
            client_name: "Jane".into(),
            client_title: "CEO".into(),
            company_name: "Acme".into(),
            testimonial_text: "Great".into(),
            rating: 5,
            display_order: 0,
            is_active: true,
        };
        assert!(t.validate().is_ok());
        t.rating = 0;
        assert!(t.validate().is_err());
        t.rating = 6;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_default_site_settings() {
        let s = SiteSettings::default();
        assert_eq!(s.site_name, "MWPUAE Platform");
        assert_eq!(s.currency, "USD");
        assert_eq!(s.annual_fee, Decimal::ZERO);
    }
}
