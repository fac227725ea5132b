//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and infrastructure to fulfil
//! marketplace use cases. Handlers depend on the service traits; each
//! manager reaches storage only through the Unit of Work.
//!
//! Operations acting on behalf of a caller take an explicit `&Principal`.

mod account_service;
mod auth_service;
mod catalog_service;
pub mod container;
mod content_service;
mod dashboard_service;
mod messaging_service;
mod notification_service;
mod quote_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use catalog_service::{CatalogManager, CatalogService};
pub use content_service::{ContentManager, ContentService};
pub use dashboard_service::{DashboardManager, DashboardService};
pub use messaging_service::{MessagingManager, MessagingService};
pub use notification_service::{NotificationManager, NotificationService};
pub use quote_service::{QuoteManager, QuoteService};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
