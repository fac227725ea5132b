//! Product listing entity.

use sea_orm::entity::prelude::*;

use crate::domain::media::from_minor_units;
use crate::domain::{Product, ProductStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Price in minor units (cents)
    pub price_minor: i64,
    pub currency: String,
    pub minimum_order_quantity: String,
    pub lead_time: String,
    /// JSON array of data URIs
    #[sea_orm(column_type = "Text")]
    pub images: String,
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    pub status: String,
    pub featured: bool,
    pub views_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Serialize the image list for the `images` column.
pub fn encode_images(images: &[String]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string())
}

fn decode_images(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Unreadable product images column: {}", e);
        Vec::new()
    })
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            company_id: model.company_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price: from_minor_units(model.price_minor),
            currency: model.currency,
            minimum_order_quantity: model.minimum_order_quantity,
            lead_time: model.lead_time,
            images: decode_images(&model.images),
            tags: model.tags,
            status: ProductStatus::from(model.status.as_str()),
            featured: model.featured,
            views_count: model.views_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
