//! Catalog: industries, categories and product listings.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::media::ImageUpload;
use crate::config::MAX_PRODUCT_IMAGES;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Lowercase, hyphen-separated slug ("Metal & Wood" -> "metal-wood").
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Industry {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// CSS icon class
    pub icon: String,
    /// Data URI, empty when unset
    pub image: String,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewIndustry {
    #[validate(length(min = 1, max = 100, message = "Industry name is required"))]
    pub name: String,
    /// Derived from the name when omitted
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub image: Option<ImageUpload>,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub industry_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
    pub industry_id: Uuid,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
}

/// Top-level category with its direct subcategories
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryTree {
    pub category: Category,
    pub subcategories: Vec<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct IndustryStats {
    pub active_categories: u64,
    pub total_products: u64,
    pub active_suppliers: u64,
}

/// Industries page entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndustryOverview {
    pub industry: Industry,
    pub categories: Vec<CategoryTree>,
    pub stats: IndustryStats,
}

/// Listing lifecycle; only `Active` is publicly visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    Active,
    Pending,
    Sold,
    Expired,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Pending => "pending",
            ProductStatus::Sold => "sold",
            ProductStatus::Expired => "expired",
        }
    }

    /// Publish unless the owner asked to keep a draft
    pub fn for_submission(save_draft: bool) -> Self {
        if save_draft {
            ProductStatus::Draft
        } else {
            ProductStatus::Active
        }
    }
}

impl From<&str> for ProductStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => ProductStatus::Active,
            "pending" => ProductStatus::Pending,
            "sold" => ProductStatus::Sold,
            "expired" => ProductStatus::Expired,
            _ => ProductStatus::Draft,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "100.00")]
    pub price: Decimal,
    pub currency: String,
    pub minimum_order_quantity: String,
    pub lead_time: String,
    /// Ordered data URIs, at most five
    pub images: Vec<String>,
    /// Comma-separated
    pub tags: String,
    pub status: ProductStatus,
    pub featured: bool,
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn tag_list(&self) -> Vec<String> {
        tag_list(&self.tags)
    }
}

/// Split a comma-separated tag string, dropping blanks.
pub fn tag_list(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop the images listed in `remove`, then append `add` while under the limit.
pub fn merge_images(existing: Vec<String>, remove: &[String], add: Vec<String>) -> Vec<String> {
    let mut images: Vec<String> = existing
        .into_iter()
        .filter(|img| !remove.contains(img))
        .collect();
    for img in add {
        if images.len() >= MAX_PRODUCT_IMAGES {
            break;
        }
        images.push(img);
    }
    images
}

/// Create/edit payload for a vendor's product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    pub category_id: Uuid,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[schema(value_type = String, example = "100.00")]
    pub price: Decimal,
    pub currency: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub minimum_order_quantity: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub lead_time: String,
    #[serde(default)]
    pub tags: String,
    /// New images to attach
    #[serde(default)]
    pub images: Vec<ImageUpload>,
    /// Existing data URIs to drop (edit only)
    #[serde(default)]
    pub remove_images: Vec<String>,
    /// Keep as draft instead of publishing
    #[serde(default)]
    pub save_draft: bool,
}

/// Public listing filters; every filter is optional and AND-combined
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Case-insensitive substring over name, description and tags
    pub query: Option<String>,
    pub category: Option<Uuid>,
    pub industry: Option<Uuid>,
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    /// Trimmed, non-empty search text
    pub fn search_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Public view of the company behind a listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SupplierSummary {
    pub id: Uuid,
    pub company_name: String,
    pub is_verified: bool,
}

/// Product detail page payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Category,
    pub supplier: SupplierSummary,
    pub related_products: Vec<Product>,
    pub company_products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Metal & Wood"), "metal-wood");
        assert_eq!(slugify("  Plastics  "), "plastics");
        assert_eq!(slugify("Machineries/Technology 2.0"), "machineries-technology-2-0");
    }

    #[test]
    fn test_tag_list_drops_blanks() {
        assert_eq!(
            tag_list(" steel, ,rods ,  bulk"),
            vec!["steel".to_string(), "rods".to_string(), "bulk".to_string()]
        );
        assert!(tag_list("").is_empty());
    }

    #[test]
    fn test_merge_images_caps_at_five() {
        let existing: Vec<String> = (0..4).map(|i| format!("img{i}")).collect();
        let merged = merge_images(
            existing,
            &["img1".to_string()],
            vec!["new1".into(), "new2".into(), "new3".into()],
        );
        assert_eq!(merged, vec!["img0", "img2", "img3", "new1", "new2"]);
    }

    #[test]
    fn test_submission_status() {
        assert_eq!(ProductStatus::for_submission(true), ProductStatus::Draft);
        assert_eq!(ProductStatus::for_submission(false), ProductStatus::Active);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = ProductFilter {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.search_text().is_none());
    }
}
