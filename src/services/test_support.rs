//! Unit of Work over mock repositories for service tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    AccountRepository, CatalogRepository, ContentRepository, MockAccountRepository,
    MockCatalogRepository, MockContentRepository, MockNotificationRepository,
    MockQuoteRepository, NotificationRepository, QuoteRepository, TransactionContext, UnitOfWork,
};

/// Repositories default to mocks with no expectations, so any unplanned
/// call fails the test.
pub(crate) struct TestUnitOfWork {
    accounts: Arc<MockAccountRepository>,
    catalog: Arc<MockCatalogRepository>,
    quotes: Arc<MockQuoteRepository>,
    notifications: Arc<MockNotificationRepository>,
    content: Arc<MockContentRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            accounts: Arc::new(MockAccountRepository::new()),
            catalog: Arc::new(MockCatalogRepository::new()),
            quotes: Arc::new(MockQuoteRepository::new()),
            notifications: Arc::new(MockNotificationRepository::new()),
            content: Arc::new(MockContentRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_accounts(mut self, repo: MockAccountRepository) -> Self {
        self.accounts = Arc::new(repo);
        self
    }

    pub fn with_catalog(mut self, repo: MockCatalogRepository) -> Self {
        self.catalog = Arc::new(repo);
        self
    }

    pub fn with_quotes(mut self, repo: MockQuoteRepository) -> Self {
        self.quotes = Arc::new(repo);
        self
    }

    pub fn with_notifications(mut self, repo: MockNotificationRepository) -> Self {
        self.notifications = Arc::new(repo);
        self
    }

    pub fn with_content(mut self, repo: MockContentRepository) -> Self {
        self.content = Arc::new(repo);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    fn quotes(&self) -> Arc<dyn QuoteRepository> {
        self.quotes.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notifications.clone()
    }

    fn content(&self) -> Arc<dyn ContentRepository> {
        self.content.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transactional paths are covered by the SQLite integration tests
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
