//! Site-wide settings; the first row wins.

use sea_orm::entity::prelude::*;

use crate::domain::media::from_minor_units;
use crate::domain::SiteSettings;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_name: String,
    pub annual_fee_minor: i64,
    pub currency: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    #[sea_orm(column_type = "Text")]
    pub site_logo: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SiteSettings {
    fn from(model: Model) -> Self {
        SiteSettings {
            site_name: model.site_name,
            annual_fee: from_minor_units(model.annual_fee_minor),
            currency: model.currency,
            contact_email: model.contact_email,
            contact_phone: model.contact_phone,
            address: model.address,
            site_logo: model.site_logo,
        }
    }
}
