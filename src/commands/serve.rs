//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, EmailDelivery};
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, LogMailer, Mailer, QueueMailer};

use super::jobs::email_storage;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let db = Arc::new(db);

    let cache = Cache::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
    let cache = Arc::new(cache);
    tracing::info!("Redis cache connected");

    let mailer = build_mailer(&config).await?;
    let addr = config.server_addr(args.host, args.port);

    let app_state = AppState::from_config(db, cache, config, mailer);
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Connect info feeds the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn build_mailer(config: &Config) -> AppResult<Arc<dyn Mailer>> {
    match config.email_delivery {
        EmailDelivery::Queue => {
            let storage = email_storage(config).await?;
            tracing::info!("Email delivery: job queue");
            Ok(Arc::new(QueueMailer::new(storage, config.mail_from.clone())))
        }
        EmailDelivery::Log => {
            tracing::warn!("Email delivery: log only, no mail will be sent");
            Ok(Arc::new(LogMailer::new(config.mail_from.clone())))
        }
    }
}
