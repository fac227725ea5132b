//! B2B marketplace API.
//!
//! Companies register as vendors or buyers, vendors list products in an
//! industry/category catalog, and buyers request quotes. Each quote opens
//! a two-party conversation and notifies the supplier.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Business entities and rules
//! - **services**: Use cases, one trait + manager per area
//! - **infra**: Database, cache, mailer and repositories
//! - **jobs**: Background email jobs
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! marketplace serve
//!
//! # Run migrations
//! marketplace migrate up
//!
//! # Process queued email
//! marketplace jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{CompanyRole, Password, Principal, SubscriptionStatus};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
