use sea_orm::entity::prelude::*;

use crate::domain::Industry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "industries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub icon: String,
    /// Data URI
    #[sea_orm(column_type = "Text")]
    pub image: String,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Industry {
    fn from(model: Model) -> Self {
        Industry {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            icon: model.icon,
            image: model.image,
            is_active: model.is_active,
            display_order: model.display_order,
            created_at: model.created_at,
        }
    }
}
