//! Jobs command - Email job queue management.
//!
//! - `work`: Start the email worker process
//! - `list`: Show job counts by status
//! - `clear`: Remove failed jobs from the queue
//!
//! ## Usage
//!
//! ```bash
//! marketplace jobs work
//! marketplace jobs list
//! marketplace jobs clear
//! ```

use apalis_sql::postgres::PostgresStorage;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Open the Postgres-backed email queue, creating its tables if needed.
///
/// Shared by the web process (producer) and the worker (consumer).
pub async fn email_storage(config: &Config) -> AppResult<PostgresStorage<EmailJob>> {
    use apalis_sql::sqlx::postgres::PgPoolOptions;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to job queue: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(PostgresStorage::new(pool))
}

/// Start the email worker
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;

    use crate::config::JOB_NAME_EMAIL;
    use crate::jobs::email_job_handler;

    tracing::info!("Connecting to database for job worker...");
    let email_storage = email_storage(config).await?;

    tracing::info!("Job worker started. Press Ctrl+C to stop.");

    let worker = WorkerBuilder::new(JOB_NAME_EMAIL)
        .backend(email_storage)
        .build_fn(email_job_handler);

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped.");
    Ok(())
}

async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    tracing::info!("Connecting to database...");
    Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))
}

/// The apalis schema only exists once a worker or the web process set it up.
async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') as exists",
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

/// Job counts by status
#[derive(Debug, Default, PartialEq, Eq)]
struct QueueCounts {
    pending: i64,
    running: i64,
    failed: i64,
    done: i64,
}

impl QueueCounts {
    fn record(&mut self, status: &str, count: i64) {
        match status {
            "Pending" => self.pending = count,
            "Running" => self.running = count,
            "Failed" => self.failed = count,
            "Done" => self.done = count,
            _ => {}
        }
    }
}

/// List job counts by status
async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("\n=== Email Queue Status ===");
        println!("Job queue not initialized.");
        println!("Run 'jobs work' or 'serve' first to create the queue tables.");
        println!("==========================\n");
        return Ok(());
    }

    let rows = db
        .query_all(Statement::from_string(
            DbBackend::Postgres,
            "SELECT status::text as status, COUNT(*)::bigint as count FROM apalis.jobs GROUP BY status",
        ))
        .await?;

    let mut counts = QueueCounts::default();
    for row in rows {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            counts.record(&status, count);
        }
    }

    println!("\n=== Email Queue Status ===");
    println!("Pending:  {}", counts.pending);
    println!("Running:  {}", counts.running);
    println!("Failed:   {}", counts.failed);
    println!("Done:     {}", counts.done);
    println!("==========================\n");

    Ok(())
}

/// Clear failed jobs from the queue
async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .execute(Statement::from_string(
            DbBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'",
        ))
        .await?;

    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_counts_ignore_unknown_status() {
        let mut counts = QueueCounts::default();
        counts.record("Pending", 3);
        counts.record("Failed", 1);
        counts.record("Killed", 9);
        assert_eq!(
            counts,
            QueueCounts {
                pending: 3,
                running: 0,
                failed: 1,
                done: 0,
            }
        );
    }
}
