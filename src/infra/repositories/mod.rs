//! Repository layer - Data access abstraction
//!
//! Each repository has a pooled-connection store behind a trait (mocked in
//! service tests) and, where a workflow writes several rows atomically, a
//! `Tx*` counterpart bound to an open transaction.

mod account_repository;
mod base;
mod catalog_repository;
mod content_repository;
pub(crate) mod entities;
mod notification_repository;
mod quote_repository;

pub use account_repository::{
    AccountRepository, AccountStore, CompanyChanges, NewCompanyRecord, TxAccountRepository,
};
pub use catalog_repository::{CatalogRepository, CatalogStore, NewIndustryRecord, ProductRecord};
pub use content_repository::{ContentRepository, ContentStore, HeroImageRecord};
pub use notification_repository::{
    NotificationRepository, NotificationStore, TxNotificationRepository,
};
pub use quote_repository::{QuoteRepository, QuoteStore, TxQuoteRepository};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_repository::MockCatalogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use content_repository::MockContentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use quote_repository::MockQuoteRepository;
