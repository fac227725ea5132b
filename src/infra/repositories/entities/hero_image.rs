use sea_orm::entity::prelude::*;

use crate::domain::HeroImage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hero_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub hero_title: String,
    #[sea_orm(column_type = "Text")]
    pub hero_subtitle: String,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for HeroImage {
    fn from(model: Model) -> Self {
        HeroImage {
            id: model.id,
            title: model.title,
            hero_title: model.hero_title,
            hero_subtitle: model.hero_subtitle,
            image: model.image,
            is_active: model.is_active,
            display_order: model.display_order,
            created_at: model.created_at,
        }
    }
}
