use sea_orm::entity::prelude::*;

use crate::domain::Conversation;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub quote_request_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self, participants: Vec<Uuid>) -> Conversation {
        Conversation {
            id: self.id,
            quote_request_id: self.quote_request_id,
            participants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
