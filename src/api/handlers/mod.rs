//! HTTP request handlers.

pub mod account_handler;
pub mod admin_handler;
pub mod auth_handler;
pub mod catalog_handler;
pub mod content_handler;
pub mod dashboard_handler;
pub mod messaging_handler;
pub mod notification_handler;
pub mod quote_handler;

pub use account_handler::account_routes;
pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use catalog_handler::{catalog_routes, vendor_routes};
pub use content_handler::content_routes;
pub use messaging_handler::conversation_routes;
pub use notification_handler::{notification_routes, unread_count_routes};
pub use quote_handler::quote_routes;
