use sea_orm::entity::prelude::*;

use crate::domain::media::from_minor_units;
use crate::domain::{QuoteRequest, QuoteStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "quote_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub requester_id: Uuid,
    pub supplier_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub quantity: String,
    pub target_price_minor: Option<i64>,
    pub delivery_location: String,
    pub expected_delivery: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for QuoteRequest {
    fn from(model: Model) -> Self {
        QuoteRequest {
            id: model.id,
            product_id: model.product_id,
            requester_id: model.requester_id,
            supplier_id: model.supplier_id,
            message: model.message,
            quantity: model.quantity,
            target_price: model.target_price_minor.map(from_minor_units),
            delivery_location: model.delivery_location,
            expected_delivery: model.expected_delivery,
            contact_name: model.contact_name,
            contact_email: model.contact_email,
            contact_phone: model.contact_phone,
            status: QuoteStatus::from(model.status.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
