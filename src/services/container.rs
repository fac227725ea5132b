//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers reach every use case through `ServiceContainer`; the concrete
//! `Services` wires all managers onto one shared `Persistence`.

use std::future::Future;
use std::sync::Arc;

use super::{
    AccountService, AuthService, CatalogService, ContentService, DashboardService,
    MessagingService, NotificationService, QuoteService,
};
use crate::config::{Config, DASHBOARD_PATH};
use crate::errors::AppResult;
use crate::infra::{Mailer, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Registration, login and token verification
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Company profiles and staff account hooks
    fn accounts(&self) -> Arc<dyn AccountService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn quotes(&self) -> Arc<dyn QuoteService>;

    fn messaging(&self) -> Arc<dyn MessagingService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;

    fn dashboards(&self) -> Arc<dyn DashboardService>;

    /// Marketing pages and site settings
    fn content(&self) -> Arc<dyn ContentService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    catalog_service: Arc<dyn CatalogService>,
    quote_service: Arc<dyn QuoteService>,
    messaging_service: Arc<dyn MessagingService>,
    notification_service: Arc<dyn NotificationService>,
    dashboard_service: Arc<dyn DashboardService>,
    content_service: Arc<dyn ContentService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        use super::{
            AccountManager, Authenticator, CatalogManager, ContentManager,
            DashboardManager, MessagingManager, NotificationManager, QuoteManager,
        };

        let uow = Arc::new(Persistence::new(db));
        let dashboard_link = config.absolute_url(DASHBOARD_PATH);

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            account_service: Arc::new(AccountManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            quote_service: Arc::new(QuoteManager::new(uow.clone(), mailer, dashboard_link)),
            messaging_service: Arc::new(MessagingManager::new(uow.clone())),
            notification_service: Arc::new(NotificationManager::new(uow.clone())),
            dashboard_service: Arc::new(DashboardManager::new(uow.clone())),
            content_service: Arc::new(ContentManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn quotes(&self) -> Arc<dyn QuoteService> {
        self.quote_service.clone()
    }

    fn messaging(&self) -> Arc<dyn MessagingService> {
        self.messaging_service.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notification_service.clone()
    }

    fn dashboards(&self) -> Arc<dyn DashboardService> {
        self.dashboard_service.clone()
    }

    fn content(&self) -> Arc<dyn ContentService> {
        self.content_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
///
/// Dashboards and list views use these to issue independent reads at once.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (messages, notifications) = parallel::join2(
    ///     quotes.count_unread_messages(company_id),
    ///     notifications.count_unread(company_id),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute three independent async operations in parallel.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }

    /// Execute a collection of homogeneous async operations in parallel.
    ///
    /// Results are returned in the same order as the input futures.
    pub async fn join_all<F, T>(futures: Vec<F>) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
    {
        let results = futures::future::join_all(futures).await;
        results.into_iter().collect()
    }

    /// Execute operations in parallel with a concurrency limit.
    ///
    /// Keeps per-row lookups from exhausting the connection pool.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        stream::iter(futures)
            .buffered(limit.max(1))
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<i32> {
            Ok(2)
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_parallel_join_all_keeps_order() {
        let futures: Vec<_> = (0..5).map(|i| async move { Ok(i) as AppResult<i32> }).collect();
        let results = parallel::join_all(futures).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_parallel_join_all_limited_fails_fast() {
        let futures = (0..4).map(|i| async move {
            if i == 2 {
                Err(AppError::NotFound)
            } else {
                Ok(i)
            }
        });
        let result = parallel::join_all_limited(futures, 2).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_parallel_join_all_limited_keeps_order() {
        let futures = (0..6).map(|i| async move { Ok(i * 10) as AppResult<i32> });
        let results = parallel::join_all_limited(futures, 3).await.unwrap();
        assert_eq!(results, vec![0, 10, 20, 30, 40, 50]);
    }
}
