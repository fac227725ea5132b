//! Company profile entity (1:1 with `users`).

use sea_orm::entity::prelude::*;

use crate::domain::{Company, CompanyRole, SubscriptionStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub company_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub logo: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub registration_number: String,
    pub country_of_registration: String,
    pub other_industry: String,
    pub role: String,
    pub subscription_status: String,
    pub subscription_start_date: Option<DateTimeUtc>,
    pub subscription_end_date: Option<DateTimeUtc>,
    pub is_verified: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Industry links live in `company_industries` and are loaded separately.
    pub fn into_domain(self, industries: Vec<Uuid>) -> Company {
        Company {
            id: self.id,
            user_id: self.user_id,
            company_name: self.company_name,
            description: self.description,
            logo: self.logo,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            registration_number: self.registration_number,
            country_of_registration: self.country_of_registration,
            other_industry: self.other_industry,
            role: CompanyRole::from(self.role.as_str()),
            subscription_status: SubscriptionStatus::from(self.subscription_status.as_str()),
            subscription_start_date: self.subscription_start_date,
            subscription_end_date: self.subscription_end_date,
            is_verified: self.is_verified,
            industries,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
