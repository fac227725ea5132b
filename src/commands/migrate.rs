//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            print!("{}", status_report(&status));
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration...");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}

fn status_report(status: &[(String, bool)]) -> String {
    let pending = status.iter().filter(|(_, applied)| !applied).count();
    let mut report = String::new();
    for (name, applied) in status {
        let state = if *applied { "applied" } else { "pending" };
        report.push_str(&format!("{:<8} {}\n", state, name));
    }
    report.push_str(&format!("{} migration(s), {} pending\n", status.len(), pending));
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_report_counts_pending() {
        let report = status_report(&[
            ("m20240101_000001_create_accounts".to_string(), true),
            ("m20240101_000002_create_catalog".to_string(), false),
        ]);
        assert!(report.contains("applied  m20240101_000001_create_accounts"));
        assert!(report.contains("pending  m20240101_000002_create_catalog"));
        assert!(report.ends_with("2 migration(s), 1 pending\n"));
    }
}
