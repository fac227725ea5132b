use sea_orm::entity::prelude::*;

use crate::domain::{Notification, NotificationType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub notification_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub quote_request_id: Option<Uuid>,
    pub conversation_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(model: Model) -> Self {
        Notification {
            id: model.id,
            recipient_id: model.recipient_id,
            notification_type: NotificationType::from(model.notification_type.as_str()),
            title: model.title,
            message: model.message,
            quote_request_id: model.quote_request_id,
            conversation_id: model.conversation_id,
            is_read: model.is_read,
            created_at: model.created_at,
        }
    }
}
