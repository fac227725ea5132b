//! In-app notifications.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::base;
use super::entities::notification::{self, Entity as NotificationEntity};
use crate::domain::{NewNotification, Notification};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// The recipient's notifications, newest first
    async fn list(
        &self,
        recipient_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Notification>, u64)>;

    /// Returns rows updated
    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of NotificationRepository
pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn list(
        &self,
        recipient_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Notification>, u64)> {
        let query = NotificationEntity::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt);
        let (models, total) = base::fetch_page(&self.db, query, &params).await?;
        Ok((models.into_iter().map(Notification::from).collect(), total))
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let result = NotificationEntity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        base::count(
            &self.db,
            NotificationEntity::find()
                .filter(notification::Column::RecipientId.eq(recipient_id))
                .filter(notification::Column::IsRead.eq(false)),
        )
        .await
    }
}

/// Transaction-aware notification writer.
pub struct TxNotificationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxNotificationRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn create(&self, input: NewNotification) -> AppResult<Notification> {
        let model = notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            recipient_id: Set(input.recipient_id),
            notification_type: Set(input.notification_type.as_str().to_string()),
            title: Set(input.title),
            message: Set(input.message),
            quote_request_id: Set(input.quote_request_id),
            conversation_id: Set(input.conversation_id),
            is_read: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(self.txn)
        .await?;

        Ok(Notification::from(model))
    }
}
