//! Infrastructure layer - External systems integration
//!
//! - Database connections, migrations and repositories
//! - Redis (rate limiting, health)
//! - Outbound mail hand-off
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod mailer;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use mailer::{LogMailer, Mailer, QueueMailer};
pub use repositories::{
    AccountRepository, CatalogRepository, ContentRepository, NotificationRepository,
    QuoteRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAccountRepository, MockCatalogRepository, MockContentRepository,
    MockNotificationRepository, MockQuoteRepository,
};
