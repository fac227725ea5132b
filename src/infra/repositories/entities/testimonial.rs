use sea_orm::entity::prelude::*;

use crate::domain::Testimonial;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "testimonials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_name: String,
    pub client_title: String,
    pub company_name: String,
    #[sea_orm(column_type = "Text")]
    pub testimonial_text: String,
    pub rating: i32,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Testimonial {
    fn from(model: Model) -> Self {
        Testimonial {
            id: model.id,
            client_name: model.client_name,
            client_title: model.client_title,
            company_name: model.company_name,
            testimonial_text: model.testimonial_text,
            rating: model.rating,
            is_active: model.is_active,
            display_order: model.display_order,
            created_at: model.created_at,
        }
    }
}
