//! Notification list, bulk read marking and unread badge counts.
//!
//! Listing is a pure read; callers mark notifications read explicitly.

use async_trait::async_trait;
use std::sync::Arc;

use super::container::parallel;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::{Notification, Principal, UnreadCounts};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Newest first
    async fn list(&self, principal: &Principal, page: u64) -> AppResult<Paginated<Notification>>;

    /// Returns how many were unread
    async fn mark_all_read(&self, principal: &Principal) -> AppResult<u64>;

    /// Unread messages from others plus unread notifications
    async fn unread_counts(&self, principal: &Principal) -> AppResult<UnreadCounts>;
}

pub struct NotificationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> NotificationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for NotificationManager<U> {
    async fn list(&self, principal: &Principal, page: u64) -> AppResult<Paginated<Notification>> {
        let params = PaginationParams::new(page, DEFAULT_PAGE_SIZE);
        let (items, total) = self
            .uow
            .notifications()
            .list(principal.company_id, params.clone())
            .await?;
        Ok(Paginated::new(items, &params, total))
    }

    async fn mark_all_read(&self, principal: &Principal) -> AppResult<u64> {
        self.uow
            .notifications()
            .mark_all_read(principal.company_id)
            .await
    }

    async fn unread_counts(&self, principal: &Principal) -> AppResult<UnreadCounts> {
        let quotes = self.uow.quotes();
        let notifications = self.uow.notifications();
        let (messages, unread) = parallel::join2(
            quotes.count_unread_messages(principal.company_id),
            notifications.count_unread(principal.company_id),
        )
        .await?;
        Ok(UnreadCounts::new(messages, unread))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::fixtures::principal;
    use crate::domain::{CompanyRole, SubscriptionStatus};
    use crate::infra::{MockNotificationRepository, MockQuoteRepository};
    use crate::services::test_support::TestUnitOfWork;

    #[tokio::test]
    async fn test_unread_counts_are_summed() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let company_id = buyer.company_id;

        let mut quotes = MockQuoteRepository::new();
        quotes
            .expect_count_unread_messages()
            .withf(move |id| *id == company_id)
            .returning(|_| Ok(3));
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_count_unread().returning(|_| Ok(2));

        let uow = TestUnitOfWork::default()
            .with_quotes(quotes)
            .with_notifications(notifications);
        let counts = NotificationManager::new(Arc::new(uow))
            .unread_counts(&buyer)
            .await
            .unwrap();
        assert_eq!(counts, UnreadCounts::new(3, 2));
        assert_eq!(counts.total, 5);
    }

    #[tokio::test]
    async fn test_list_does_not_mark_read() {
        let buyer = principal(CompanyRole::ConsumerBuyer, SubscriptionStatus::Active);
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_list()
            .returning(|_, _| Ok((vec![], 0)));
        notifications.expect_mark_all_read().never();

        let uow = TestUnitOfWork::default().with_notifications(notifications);
        let page = NotificationManager::new(Arc::new(uow))
            .list(&buyer, 1)
            .await
            .unwrap();
        assert_eq!(page.meta.total, 0);
    }
}
